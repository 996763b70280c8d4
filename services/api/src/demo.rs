use crate::infra::{
    parse_candidate, parse_opportunity, InMemoryNotificationPublisher, InMemoryPlacementRepository,
};
use crate::routes::{catalog_report, CatalogReport};
use campus_placement::error::AppError;
use campus_placement::workflows::catalog::OpportunityCatalogImporter;
use campus_placement::workflows::placement::{
    evaluate_payload, ApplicationStatus, ApplicationTracker, CandidateId, CandidatePayload,
    EligibilityOutcome, OpportunityId, OpportunityPayload, PlacementService,
    PlacementServiceError,
};
use chrono::Local;
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EligibilityCheckArgs {
    /// Candidate profile as JSON, inline or `@file.json`
    #[arg(long, value_parser = parse_candidate)]
    pub(crate) candidate: CandidatePayload,
    /// Opportunity record as JSON, inline or `@file.json`
    #[arg(long, value_parser = parse_opportunity)]
    pub(crate) opportunity: OpportunityPayload,
    /// Print the full outcome as JSON instead of a readable trail
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogReportArgs {
    /// Catalog CSV export to import
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluate every posting for this candidate (JSON, inline or `@file.json`)
    #[arg(long, value_parser = parse_candidate)]
    pub(crate) candidate: Option<CandidatePayload>,
    /// Print the report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the application lifecycle portion of the demo.
    #[arg(long)]
    pub(crate) skip_application: bool,
}

pub(crate) fn run_eligibility_check(args: EligibilityCheckArgs) -> Result<(), AppError> {
    let outcome = evaluate_payload(Some(&args.candidate), Some(&args.opportunity));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_catalog_report(args: CatalogReportArgs) -> Result<(), AppError> {
    let CatalogReportArgs {
        csv,
        candidate,
        json,
    } = args;

    let import = OpportunityCatalogImporter::from_path(&csv)?;
    let report = catalog_report(import, candidate.as_ref(), Local::now().date_naive())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_catalog_report(&csv, &report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Campus placement demo");
    println!("\nEligibility scenarios");

    let student = json!({
        "branch": "CSE",
        "batch": 2026,
        "cgpa": 8.5,
        "internshipEligible": true,
        "fullTimeEligible": true,
        "slab": 2
    });
    let internship = json!({
        "eligibleBranches": ["CSE"],
        "eligibleBatch": [2026],
        "cgpaCriteria": 7,
        "opportunityType": "Internship",
        "ctc": "-"
    });

    let scenarios = [
        ("Internship for a qualified student", student.clone(), internship.clone()),
        (
            "Full-time posting, full-time flag still held",
            student.clone(),
            with_fields(&internship, json!({ "opportunityType": "Full Time", "ctc": "60 LPA" })),
        ),
        (
            "Placed student (slab 3) against a 10 LPA offer",
            with_fields(&student, json!({ "fullTimeEligible": false, "slab": 3 })),
            with_fields(&internship, json!({ "opportunityType": "Full Time", "ctc": "10 LPA" })),
        ),
        (
            "CGPA below criteria",
            with_fields(&student, json!({ "cgpa": 6.0 })),
            internship.clone(),
        ),
    ];

    for (title, candidate, opportunity) in scenarios {
        let candidate: CandidatePayload = serde_json::from_value(candidate)?;
        let opportunity: OpportunityPayload = serde_json::from_value(opportunity)?;
        let outcome = evaluate_payload(Some(&candidate), Some(&opportunity));
        println!("- {title}: {}", outcome.decision.summary());
    }

    if args.skip_application {
        return Ok(());
    }

    println!("\nApplication lifecycle");
    let repository = Arc::new(InMemoryPlacementRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = PlacementService::new(repository, notifications.clone());

    let candidate_id = CandidateId("stu-2026-014".to_string());
    let internship_id = OpportunityId("acme-intern".to_string());
    let full_time_id = OpportunityId("initech-analyst".to_string());

    let placed = with_fields(&student, json!({ "fullTimeEligible": false, "slab": 3 }));
    service.register_candidate(candidate_id.clone(), &serde_json::from_value(placed)?)?;
    service.publish_opportunity(
        internship_id.clone(),
        &serde_json::from_value(with_fields(
            &internship,
            json!({ "companyName": "Acme Robotics", "role": "Summer Intern" }),
        ))?,
    )?;
    service.publish_opportunity(
        full_time_id.clone(),
        &serde_json::from_value(with_fields(
            &internship,
            json!({
                "companyName": "Initech",
                "role": "Business Analyst",
                "opportunityType": "Full Time",
                "ctc": "10 LPA"
            }),
        ))?,
    )?;

    let mut tracker = ApplicationTracker::new();
    for listing in service.listings(&candidate_id)? {
        println!(
            "- {} | {} | {} | {}",
            listing.company_name, listing.role, listing.eligibility, listing.badge.label
        );
    }

    match service.apply(&candidate_id, &full_time_id) {
        Ok(_) => println!("Applied to {full_time_id}"),
        Err(PlacementServiceError::Ineligible { summary, .. }) => {
            println!("Apply to {full_time_id} refused: {summary}")
        }
        Err(err) => return Err(err.into()),
    }

    let record = service.apply(&candidate_id, &internship_id)?;
    tracker.mark_applied(&candidate_id, &internship_id);
    println!(
        "Applied to {internship_id} at {}",
        record.applied_at.format("%Y-%m-%d %H:%M UTC")
    );

    for status in [ApplicationStatus::Shortlisted, ApplicationStatus::Selected] {
        let record = service.update_status(&candidate_id, &internship_id, status)?;
        tracker.record(&candidate_id, &internship_id, record.status);
        let badge = tracker.badge(&candidate_id, &internship_id);
        println!("Recruiter update: {} ({:?})", badge.label, badge.color);
    }

    if let Err(err) =
        service.update_status(&candidate_id, &internship_id, ApplicationStatus::Rejected)
    {
        println!("Late update refused: {err}");
    }

    println!("\nNotifications sent");
    for event in notifications.events() {
        let status = event.details.get("status").map(String::as_str).unwrap_or("-");
        println!("- {} -> {} [{}]", event.template, event.candidate_id, status);
    }

    Ok(())
}

fn with_fields(base: &Value, overrides: Value) -> Value {
    let mut merged = base.clone();
    if let (Some(target), Value::Object(fields)) = (merged.as_object_mut(), overrides) {
        target.extend(fields);
    }
    merged
}

fn render_outcome(outcome: &EligibilityOutcome) {
    println!("Decision: {}", outcome.decision.summary());
    if let Some(opportunity_type) = outcome.opportunity_type {
        println!("Opportunity type: {opportunity_type}");
    }
    for check in &outcome.checks {
        let mark = if check.passed { "pass" } else { "fail" };
        let scope = if check.required { "required" } else { "ignored" };
        println!(
            "  [{mark}] {:?} ({scope}): {}",
            check.predicate, check.notes
        );
    }
}

fn render_catalog_report(source: &std::path::Path, report: &CatalogReport) {
    println!(
        "Opportunity catalog {} (generated {})",
        source.display(),
        report.generated_on
    );
    println!("{} postings imported", report.opportunities.len());
    for entry in &report.opportunities {
        let slab = entry
            .offer_slab
            .map(|slab| format!("slab {slab}"))
            .unwrap_or_else(|| "unslabbed".to_string());
        match &entry.eligibility {
            Some(eligibility) => println!(
                "- {} | {} | {} | {} ({slab}) | {eligibility}",
                entry.opportunity_id, entry.company_name, entry.opportunity_type, entry.ctc
            ),
            None => println!(
                "- {} | {} | {} | {} ({slab})",
                entry.opportunity_id, entry.company_name, entry.opportunity_type, entry.ctc
            ),
        }
    }

    if !report.rejected.is_empty() {
        println!("{} rows rejected", report.rejected.len());
        for row in &report.rejected {
            println!(
                "  line {}: {} ({})",
                row.line,
                row.opportunity_id.as_deref().unwrap_or("-"),
                row.reason
            );
        }
    }
}
