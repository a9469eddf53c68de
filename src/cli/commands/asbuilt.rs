use crate::cli::parser::{AsBuiltArgs, Commands};
use crate::config::Config;
use crate::core::asbuilt::{AsBuiltStep, AsBuiltWizard};
use crate::core::service::WriteOutcome;
use crate::core::validate;
use crate::db::log::audit_quiet;
use crate::errors::{AppError, AppResult};
use crate::models::forms::{AsBuiltForm, Checklist, ItemRow, PhotoSlot};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREEN, GREY, RESET};
use crate::utils::date::today;
use crate::utils::time::normalize_clock;

use super::{open_pool, open_service, outcome_label, report_write, signed_in};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::AsBuilt(args) = cmd else {
        return Ok(());
    };

    let pool = open_pool(cfg)?;
    let mut svc = open_service(&pool)?;
    let user = signed_in(&svc)?;
    let job = svc.get_job(&args.job)?;
    let truck = svc.truck_number()?;

    let mut wizard =
        AsBuiltWizard::open(&svc.drafts(), &job, Some(&user), truck.as_deref(), today())?;
    if wizard.restored() {
        info(format!("Resuming saved draft at step {}.", wizard.step()));
    }

    let edits = collect_edits(args)?;
    if !edits.is_empty() {
        wizard.edit(&mut svc.drafts(), |form| {
            for edit in edits {
                edit(&mut *form);
            }
        })?;
    }

    if args.back {
        let step = wizard.back(&mut svc.drafts())?;
        info(format!("Back to step {step}"));
    } else if args.next {
        let before = wizard.step();
        let step = wizard.next(&mut svc.drafts())?;
        if step == before {
            success(format!("Step {step} is complete. Submit with --submit."));
        } else {
            success(format!("Moved to step {step}"));
        }
    } else if args.submit {
        let outcome = wizard.submit(&mut svc)?;
        report_write("As-Built", outcome);
        if matches!(outcome, WriteOutcome::Applied) {
            success(format!("{} marked as complete.", args.job));
        }
        audit_quiet(&pool.conn, "as-built", &args.job, outcome_label(outcome));
        return Ok(());
    }

    print_step(&wizard);
    Ok(())
}

type Edit = Box<dyn FnOnce(&mut AsBuiltForm)>;

/// Turn the setter flags into form edits, rejecting malformed values up front.
fn collect_edits(args: &AsBuiltArgs) -> AppResult<Vec<Edit>> {
    let mut edits: Vec<Edit> = Vec::new();

    fn set_text(edits: &mut Vec<Edit>, value: &Option<String>, f: fn(&mut AsBuiltForm, String)) {
        if let Some(v) = value.clone() {
            edits.push(Box::new(move |form: &mut AsBuiltForm| f(form, v)));
        }
    }

    set_text(&mut edits, &args.job_name, |f, v| f.header.job_name = v);
    set_text(&mut edits, &args.address, |f, v| f.header.street_address = v);
    set_text(&mut edits, &args.foreman, |f, v| f.header.foreman = v);
    set_text(&mut edits, &args.crew, |f, v| f.header.second_crew_member = v);
    set_text(&mut edits, &args.bay_info, |f, v| f.bay_info = v);
    set_text(&mut edits, &args.notes, |f, v| f.notes = v);
    set_text(&mut edits, &args.drawing, |f, v| f.drawing = Some(v));
    set_text(&mut edits, &args.signature, |f, v| f.signature = Some(v));

    if let Some(t) = &args.clock_in {
        let t = normalize_clock("clock-in", t)?;
        edits.push(Box::new(move |f: &mut AsBuiltForm| f.header.clock_in = t));
    }
    if let Some(t) = &args.clock_out {
        let t = normalize_clock("clock-out", t)?;
        edits.push(Box::new(move |f: &mut AsBuiltForm| f.header.clock_out = t));
    }

    for spec in &args.items {
        let row = parse_item(spec)?;
        edits.push(Box::new(move |f: &mut AsBuiltForm| f.items.push(row)));
    }

    for spec in &args.photos {
        let (slot, image) = spec.split_once('=').ok_or_else(|| {
            AppError::InvalidField(format!("photo: expected SLOT=IMAGE, got '{spec}'"))
        })?;
        let image = image.trim().to_string();
        if slot.eq_ignore_ascii_case("extra") {
            edits.push(Box::new(move |f: &mut AsBuiltForm| f.photos.additional.push(image)));
            continue;
        }
        let slot = PhotoSlot::parse(slot).ok_or_else(|| {
            AppError::InvalidField(format!(
                "photo: unknown slot '{slot}' (front, rear, sideA, sideB, signage, extra)"
            ))
        })?;
        edits.push(Box::new(move |f: &mut AsBuiltForm| f.photos.set(slot, &image)));
    }

    for key in &args.checks {
        if !Checklist::KEYS.contains(&key.as_str()) {
            return Err(AppError::InvalidField(format!(
                "check: unknown item '{key}' ({})",
                Checklist::KEYS.join(", ")
            )));
        }
        let key = key.clone();
        edits.push(Box::new(move |f: &mut AsBuiltForm| {
            f.checklist.tick(&key);
        }));
    }

    Ok(edits)
}

/// `item:qty[:gateA[:gateB]]`
fn parse_item(spec: &str) -> AppResult<ItemRow> {
    let mut parts = spec.split(':').map(str::trim);
    let item = parts.next().unwrap_or_default().to_string();
    let qty = parts
        .next()
        .ok_or_else(|| AppError::InvalidField(format!("item: expected item:qty, got '{spec}'")))?;
    let qty: u32 = qty
        .parse()
        .map_err(|_| AppError::InvalidField(format!("item: '{qty}' is not a quantity")))?;

    if item.is_empty() {
        return Err(AppError::InvalidField("item: name is required".to_string()));
    }

    Ok(ItemRow {
        item,
        qty,
        gate_a: parts.next().unwrap_or_default().to_string(),
        gate_b: parts.next().unwrap_or_default().to_string(),
    })
}

fn print_step(wizard: &AsBuiltWizard) {
    let form = wizard.form();
    let step = wizard.step();
    header(format!("As-Built · {} · step {step}", wizard.job_id()));

    match step {
        AsBuiltStep::Header => {
            let h = &form.header;
            for (label, value) in [
                ("Job name", &h.job_name),
                ("Address", &h.street_address),
                ("Foreman", &h.foreman),
                ("2nd crew", &h.second_crew_member),
                ("Clock in", &h.clock_in),
                ("Clock out", &h.clock_out),
                ("Truck", &h.truck),
                ("Date", &h.date),
            ] {
                println!("{label:<10}: {}", shown(value));
            }
        }
        AsBuiltStep::Drawing => {
            println!("Drawing   : {}", shown(form.drawing.as_deref().unwrap_or("")));
        }
        AsBuiltStep::Items => {
            for row in &form.items {
                println!(
                    "{:<20} x{:<4} {} {}",
                    row.item, row.qty, row.gate_a, row.gate_b
                );
            }
            if form.items.is_empty() {
                println!("{GREY}no items yet (--item name:qty){RESET}");
            }
            if !form.bay_info.is_empty() {
                println!("Bay info  : {}", form.bay_info);
            }
        }
        AsBuiltStep::Photos => {
            for slot in PhotoSlot::ALL {
                let value = form.photos.slot(slot).map(String::as_str).unwrap_or("");
                println!("{:<10}: {}", slot.as_str(), shown(value));
            }
            if !form.photos.additional.is_empty() {
                println!("extra     : {}", form.photos.additional.join(", "));
            }
        }
        AsBuiltStep::Checklist => {
            let c = &form.checklist;
            for (key, done) in Checklist::KEYS.iter().zip([
                c.site_cleaned,
                c.gates_operational,
                c.customer_walkthrough,
                c.debris_removed,
            ]) {
                let mark = if done {
                    format!("{GREEN}✔{RESET}")
                } else {
                    format!("{GREY}·{RESET}")
                };
                println!("{mark} {key}");
            }
        }
        AsBuiltStep::Signature => {
            if !form.notes.is_empty() {
                println!("Notes     : {}", form.notes);
            }
            println!(
                "Signature : {}",
                shown(form.signature.as_deref().unwrap_or(""))
            );
        }
    }

    match validate::as_built_step(form, step) {
        Ok(()) if step.is_last() => info("Ready: submit with --submit"),
        Ok(()) => info("Step complete: continue with --next"),
        Err(e) => warning(e),
    }
}

fn shown(value: &str) -> String {
    if value.trim().is_empty() {
        format!("{GREY}--{RESET}")
    } else {
        value.to_string()
    }
}
