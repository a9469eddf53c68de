//! Typed form payloads for the safety analyses and the As-Built record.
//!
//! Every form has a fixed, enumerated field set so validation is exhaustive.
//! Field names serialize in camelCase, matching what the mobile client stores.

use crate::models::draft::FormType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Yes/No answer. Persisted as `true` / `false` / `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Answer {
    Yes,
    No,
    #[default]
    Unanswered,
}

impl From<Option<bool>> for Answer {
    fn from(v: Option<bool>) -> Self {
        match v {
            Some(true) => Answer::Yes,
            Some(false) => Answer::No,
            None => Answer::Unanswered,
        }
    }
}

impl From<Answer> for Option<bool> {
    fn from(a: Answer) -> Self {
        match a {
            Answer::Yes => Some(true),
            Answer::No => Some(false),
            Answer::Unanswered => None,
        }
    }
}

impl Answer {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "true" => Some(Answer::Yes),
            "no" | "n" | "false" => Some(Answer::No),
            "" | "unanswered" | "null" => Some(Answer::Unanswered),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Unanswered => "unanswered",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub answer: Answer,
    #[serde(default)]
    pub details: String,
}

impl Question {
    pub fn answered(answer: Answer, details: &str) -> Self {
        Self {
            answer,
            details: details.to_string(),
        }
    }
}

/// Borrowed view of one question with its fixed id and prompt.
pub struct QuestionRef<'a> {
    pub id: &'static str,
    pub prompt: &'static str,
    pub question: &'a Question,
}

/// A single-screen yes/no safety questionnaire.
pub trait Questionnaire: Default + Clone + Serialize + DeserializeOwned {
    const FORM: FormType;
    const TITLE: &'static str;

    fn questions(&self) -> Vec<QuestionRef<'_>>;

    fn question_mut(&mut self, id: &str) -> Option<&mut Question>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreJsaAnswers {
    pub q1: Question,
    pub q2: Question,
    pub q3: Question,
    pub q4: Question,
}

impl PreJsaAnswers {
    pub fn all(answer: Answer) -> Self {
        let q = Question::answered(answer, "");
        Self {
            q1: q.clone(),
            q2: q.clone(),
            q3: q.clone(),
            q4: q,
        }
    }
}

impl Questionnaire for PreJsaAnswers {
    const FORM: FormType = FormType::PreJsa;
    const TITLE: &'static str = "Pre-Job Safety Analysis";

    fn questions(&self) -> Vec<QuestionRef<'_>> {
        vec![
            QuestionRef {
                id: "q1",
                prompt: "Does the Team fully understand the task procedures and the potential hazards on this job site?",
                question: &self.q1,
            },
            QuestionRef {
                id: "q2",
                prompt: "Do team members have the required PPE for this job site, and can they confidently explain how and when to use it?",
                question: &self.q2,
            },
            QuestionRef {
                id: "q3",
                prompt: "Have all team members been certified and trained to use the tools and equipment on site properly and safely?",
                question: &self.q3,
            },
            QuestionRef {
                id: "q4",
                prompt: "Have all team members reviewed and understood the emergency reporting procedures?",
                question: &self.q4,
            },
        ]
    }

    fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        match id {
            "q1" => Some(&mut self.q1),
            "q2" => Some(&mut self.q2),
            "q3" => Some(&mut self.q3),
            "q4" => Some(&mut self.q4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostJsaAnswers {
    pub q1: Question,
    pub q2: Question,
    pub q3: Question,
}

impl PostJsaAnswers {
    pub fn all(answer: Answer) -> Self {
        let q = Question::answered(answer, "");
        Self {
            q1: q.clone(),
            q2: q.clone(),
            q3: q,
        }
    }
}

impl Questionnaire for PostJsaAnswers {
    const FORM: FormType = FormType::PostJsa;
    const TITLE: &'static str = "Post-Job Safety Analysis";

    fn questions(&self) -> Vec<QuestionRef<'_>> {
        vec![
            QuestionRef {
                id: "q1",
                prompt: "Was this job completed without any incidents, injuries, or near misses?",
                question: &self.q1,
            },
            QuestionRef {
                id: "q2",
                prompt: "Were all tools and equipment inspected, cleaned, returned, and stored properly after the task?",
                question: &self.q2,
            },
            QuestionRef {
                id: "q3",
                prompt: "Before leaving this job site, were any hazards, unsafe conditions, or lessons learned identified and reported?",
                question: &self.q3,
            },
        ]
    }

    fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        match id {
            "q1" => Some(&mut self.q1),
            "q2" => Some(&mut self.q2),
            "q3" => Some(&mut self.q3),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// As-Built
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsBuiltHeader {
    pub job_name: String,
    pub street_address: String,
    pub foreman: String,
    pub second_crew_member: String,
    pub clock_in: String,
    pub clock_out: String,
    pub truck: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemRow {
    pub item: String,
    pub qty: u32,
    pub gate_a: String,
    pub gate_b: String,
}

/// The five photos every As-Built must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSlot {
    Front,
    Rear,
    SideA,
    SideB,
    Signage,
}

impl PhotoSlot {
    pub const ALL: [PhotoSlot; 5] = [
        PhotoSlot::Front,
        PhotoSlot::Rear,
        PhotoSlot::SideA,
        PhotoSlot::SideB,
        PhotoSlot::Signage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoSlot::Front => "front",
            PhotoSlot::Rear => "rear",
            PhotoSlot::SideA => "sideA",
            PhotoSlot::SideB => "sideB",
            PhotoSlot::Signage => "signage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "front" => Some(PhotoSlot::Front),
            "rear" => Some(PhotoSlot::Rear),
            "sidea" => Some(PhotoSlot::SideA),
            "sideb" => Some(PhotoSlot::SideB),
            "signage" => Some(PhotoSlot::Signage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitePhotos {
    pub front: Option<String>,
    pub rear: Option<String>,
    pub side_a: Option<String>,
    pub side_b: Option<String>,
    pub signage: Option<String>,
    pub additional: Vec<String>,
}

impl SitePhotos {
    pub fn slot(&self, slot: PhotoSlot) -> Option<&String> {
        match slot {
            PhotoSlot::Front => self.front.as_ref(),
            PhotoSlot::Rear => self.rear.as_ref(),
            PhotoSlot::SideA => self.side_a.as_ref(),
            PhotoSlot::SideB => self.side_b.as_ref(),
            PhotoSlot::Signage => self.signage.as_ref(),
        }
    }

    pub fn set(&mut self, slot: PhotoSlot, image: &str) {
        let target = match slot {
            PhotoSlot::Front => &mut self.front,
            PhotoSlot::Rear => &mut self.rear,
            PhotoSlot::SideA => &mut self.side_a,
            PhotoSlot::SideB => &mut self.side_b,
            PhotoSlot::Signage => &mut self.signage,
        };
        *target = Some(image.to_string());
    }

    /// Mandatory slots that are still empty, in display order.
    pub fn missing(&self) -> Vec<PhotoSlot> {
        PhotoSlot::ALL
            .into_iter()
            .filter(|s| self.slot(*s).is_none_or(|p| p.trim().is_empty()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Checklist {
    pub site_cleaned: bool,
    pub gates_operational: bool,
    pub customer_walkthrough: bool,
    pub debris_removed: bool,
}

impl Checklist {
    pub const KEYS: [&'static str; 4] = [
        "site-cleaned",
        "gates-operational",
        "customer-walkthrough",
        "debris-removed",
    ];

    pub fn tick(&mut self, key: &str) -> bool {
        let flag = match key {
            "site-cleaned" => &mut self.site_cleaned,
            "gates-operational" => &mut self.gates_operational,
            "customer-walkthrough" => &mut self.customer_walkthrough,
            "debris-removed" => &mut self.debris_removed,
            _ => return false,
        };
        *flag = true;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AsBuiltForm {
    pub header: AsBuiltHeader,
    pub drawing: Option<String>,
    pub items: Vec<ItemRow>,
    pub bay_info: String,
    pub photos: SitePhotos,
    pub checklist: Checklist,
    pub notes: String,
    pub signature: Option<String>,
}
