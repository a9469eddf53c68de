use crate::models::job::Job;

/// The morning schedule every fresh session (and every reset) starts from.
pub fn seed_jobs() -> Vec<Job> {
    vec![
        Job::scheduled(
            "JOB-001",
            "John Doe",
            "123 Maple Dr, Springfield, IL",
            "555-0199",
            "There should be a fence here, but isn't. Access via back alley.",
            39.7817,
            -89.6501,
            "Residential Set",
        ),
        Job::scheduled(
            "JOB-002",
            "Acme Corp",
            "777 Industrial Pkwy, Chicago, IL",
            "555-0200",
            "Security clearance required at gate. Contact Mike on arrival.",
            41.8781,
            -87.6298,
            "Commercial Build",
        ),
    ]
}
