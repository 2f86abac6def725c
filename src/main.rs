use anyhow::Context as _;
use clap::{Parser, Subcommand};

use campus_timetable::api::assign_dto::AutoAssignDto;
use campus_timetable::api::schedule_dto::{AcceptDto, RescheduleDto, UndoDto};
use campus_timetable::api::slot_dto::SlotPlanDto;
use campus_timetable::domain::identity::IdentityContext;
use campus_timetable::loader::parser::parse_json_file;
use campus_timetable::{load_campus, logger};

#[derive(Parser)]
#[command(name = "campus_timetable", about = "Scheduling and slot reservation engine")]
struct Cli {
    /// Campus seed file: rooms, sections, courses, offerings.
    #[arg(long)]
    data: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the slot catalog from a plan file.
    GenerateSlots {
        #[arg(long)]
        plan: String,
    },
    /// Create pending requests for offerings that lack one.
    SeedRequests,
    /// Batch room assignment for one shift and semester.
    AutoAssign {
        /// JSON payload: { "shift": ..., "semester": ... }
        #[arg(long)]
        payload: String,
    },
    /// Accept a pending request for a slot selection.
    Accept {
        /// JSON payload: { "requestId": ..., "slotIds": [...] }
        #[arg(long)]
        payload: String,
        /// Instructor acting on the request.
        #[arg(long = "as")]
        instructor: String,
    },
    /// Revert a freshly accepted request.
    Undo {
        /// JSON payload: { "requestId": ... }
        #[arg(long)]
        payload: String,
        /// Instructor acting on the request.
        #[arg(long = "as")]
        instructor: String,
    },
    /// Move an accepted request to a new slot selection.
    Reschedule {
        /// JSON payload: { "requestId": ..., "slotIds": [...] }
        #[arg(long)]
        payload: String,
        /// Instructor acting on the request.
        #[arg(long = "as")]
        instructor: String,
    },
    /// Rebuild the published timetable from accepted reservations.
    Materialize,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();
    let engine = load_campus(&cli.data).with_context(|| format!("loading campus data from '{}'", cli.data))?;

    // Administrative subcommands act as the scheduling administrator;
    // request subcommands act as the named instructor.
    let admin = IdentityContext::admin("cli-admin");

    match cli.command {
        Command::GenerateSlots { plan } => {
            let dto: SlotPlanDto = parse_json_file(&plan).with_context(|| format!("loading slot plan from '{}'", plan))?;
            let summary = engine.generate_slots(&admin, &dto.into_plan()?)?;
            println!("Generated {} time slot(s).", summary.created);
        }
        Command::SeedRequests => {
            let summary = engine.seed_requests(&admin)?;
            println!("Created {} pending course request(s).", summary.created);
        }
        Command::AutoAssign { payload } => {
            let dto: AutoAssignDto = parse_json_file(&payload).with_context(|| format!("loading auto-assign payload from '{}'", payload))?;
            let summary = engine.auto_assign(&admin, dto.shift, dto.semester)?;
            println!(
                "Auto-assign finished: {} fully assigned, {} partial, {} unassigned.",
                summary.assigned.len(),
                summary.partial.len(),
                summary.unassigned.len()
            );
            for entry in summary.partial.iter().chain(summary.unassigned.iter()) {
                println!("  {}: {}/{} meetings placed (short {})", entry.section_id, entry.assigned, entry.required, entry.shortfall());
            }
        }
        Command::Accept { payload, instructor } => {
            let dto: AcceptDto = parse_json_file(&payload).with_context(|| format!("loading accept payload from '{}'", payload))?;
            let outcome = engine.accept(&IdentityContext::instructor(instructor), &dto.request_id(), &dto.slot_ids())?;
            println!("Request {} accepted with {} slot(s).", outcome.request_id, outcome.reserved_slots);
        }
        Command::Undo { payload, instructor } => {
            let dto: UndoDto = parse_json_file(&payload).with_context(|| format!("loading undo payload from '{}'", payload))?;
            let outcome = engine.undo(&IdentityContext::instructor(instructor), &dto.request_id())?;
            println!("Request {} reverted to pending.", outcome.request_id);
        }
        Command::Reschedule { payload, instructor } => {
            let dto: RescheduleDto = parse_json_file(&payload).with_context(|| format!("loading reschedule payload from '{}'", payload))?;
            let outcome = engine.reschedule(&IdentityContext::instructor(instructor), &dto.request_id(), &dto.slot_ids())?;
            println!("Request {} rescheduled onto {} slot(s).", outcome.request_id, outcome.reserved_slots);
        }
        Command::Materialize => {
            let summary = engine.materialize(&admin)?;
            println!("Published {} timetable block(s) across {} section(s).", summary.blocks, summary.sections_touched);
        }
    }

    Ok(())
}
