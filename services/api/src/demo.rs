use crate::infra::{board_entries, default_automation_config, InMemoryTurnoverRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use turnover_ai::error::AppError;
use turnover_ai::workflows::pms::{PmsImport, PmsReservationImporter, CLEANING_TEMPLATE};
use turnover_ai::workflows::turnover::automation::AutoAssignRule;
use turnover_ai::workflows::turnover::{
    AutomationConfig, DateWindow, IntervalPlacement, NewTaskRequest, TaskId, TaskStatus,
    TemplateId, TimelineBoard, TimelineMode, TurnoverService, TurnoverServiceError, UserId,
};

const SAMPLE_EXPORT: &str = include_str!("../sample_reservations.csv");

#[derive(Args, Debug)]
pub(crate) struct BoardArgs {
    /// Reservation export CSV to render
    #[arg(long)]
    pub(crate) pms_csv: PathBuf,
    /// First visible date (YYYY-MM-DD); defaults to anchoring around today
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) anchor: Option<NaiveDate>,
    /// Window size: week or month
    #[arg(long, value_parser = crate::infra::parse_mode)]
    pub(crate) mode: Option<TimelineMode>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reservation export CSV; defaults to the bundled sample
    #[arg(long)]
    pub(crate) pms_csv: Option<PathBuf>,
    /// Override the reporting date (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Window size: week or month
    #[arg(long, value_parser = crate::infra::parse_mode)]
    pub(crate) mode: Option<TimelineMode>,
}

pub(crate) fn run_board(args: BoardArgs) -> Result<(), AppError> {
    let BoardArgs {
        pms_csv,
        anchor,
        mode,
        today,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mode = mode.unwrap_or(TimelineMode::Week);
    let window = match anchor {
        Some(anchor) => DateWindow::new(anchor, mode),
        None => DateWindow::jump_to_today(today, mode),
    };

    let import = PmsReservationImporter::from_path(pms_csv)?;
    let board = TimelineBoard::build(window, &board_entries(&import));
    render_board(&board);

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        pms_csv,
        today,
        mode,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let mode = mode.unwrap_or(TimelineMode::Week);

    println!("Turnover scheduling demo");
    let import = load_export(pms_csv)?;

    let properties: BTreeSet<&str> = import
        .reservations
        .iter()
        .map(|reservation| reservation.property_name.as_str())
        .collect();
    println!(
        "Imported {} reservations across {} properties; {} seeded cleaning tasks",
        import.reservations.len(),
        properties.len(),
        import.tasks.len()
    );

    let repository = InMemoryTurnoverRepository::default();
    import
        .seed_repository(&repository)
        .map_err(TurnoverServiceError::from)?;
    let template = TemplateId(CLEANING_TEMPLATE.to_string());
    for property in &properties {
        repository.set_automation_config(property, &template, demo_automation_config());
    }
    let service = Arc::new(TurnoverService::new(Arc::new(repository)));

    let showcase = match import
        .reservations
        .iter()
        .find(|reservation| reservation.same_day_turnover())
        .or_else(|| import.reservations.first())
    {
        Some(reservation) => reservation.clone(),
        None => {
            println!("The export contains no usable reservations; nothing to walk through.");
            return Ok(());
        }
    };

    println!(
        "\nAutomation walkthrough for {} at {}",
        showcase.id.0, showcase.property_name
    );
    println!(
        "- Stay {} -> {}{}",
        showcase.check_in.date(),
        showcase.check_out.date(),
        if showcase.same_day_turnover() {
            " (next guest arrives the same day)"
        } else {
            ""
        }
    );

    let created = service.create_task(NewTaskRequest {
        reservation_id: Some(showcase.id.clone()),
        property_name: None,
        template_id: template.clone(),
        name: "Deep clean and linen reset".to_string(),
        contingent: false,
    })?;
    match created.scheduled_start {
        Some(start) => println!("- Created {} scheduled for {}", created.id.0, start),
        None => println!("- Created {} with no scheduled start", created.id.0),
    }
    if created.assigned_user_ids.is_empty() {
        println!("- No cleaners auto-assigned");
    } else {
        let assignees: Vec<&str> = created
            .assigned_user_ids
            .iter()
            .map(|user| user.0.as_str())
            .collect();
        println!("- Auto-assigned to {}", assignees.join(", "));
    }

    println!("\nWorking the turnover");
    let seeded = TaskId(format!("{}-clean", showcase.id.0));
    for status in [TaskStatus::InProgress, TaskStatus::Complete] {
        let change = service.set_task_status(&seeded, status)?;
        println!(
            "- {} -> {} | turnover now {}",
            change.task.task_id.0,
            change.task.status_label,
            change.turnover_status_label.unwrap_or("n/a")
        );
    }
    let change = service.set_task_status(&created.id, TaskStatus::Complete)?;
    println!(
        "- {} -> {} | turnover now {}",
        change.task.task_id.0,
        change.task.status_label,
        change.turnover_status_label.unwrap_or("n/a")
    );
    match serde_json::to_string_pretty(&change) {
        Ok(json) => println!("  Status payload:\n{}", json),
        Err(err) => println!("  Status payload unavailable: {}", err),
    }

    let window = DateWindow::jump_to_today(today, mode);
    let board = service.board(window)?;
    render_board(&board);

    Ok(())
}

fn load_export(path: Option<PathBuf>) -> Result<PmsImport, AppError> {
    match path {
        Some(path) => {
            println!("Data source: {}", path.display());
            PmsReservationImporter::from_path(path).map_err(AppError::from)
        }
        None => {
            println!("Data source: bundled sample export");
            let reader = Cursor::new(SAMPLE_EXPORT.as_bytes());
            PmsReservationImporter::from_reader(reader).map_err(AppError::from)
        }
    }
}

/// House policy plus auto-assignment, so the walkthrough has cleaners to
/// hand the task to.
fn demo_automation_config() -> AutomationConfig {
    let mut config = default_automation_config();
    config.auto_assign = AutoAssignRule {
        enabled: true,
        user_ids: BTreeSet::from([
            UserId("user-harper".to_string()),
            UserId("user-quinn".to_string()),
        ]),
    };
    config
}

pub(crate) fn render_board(board: &TimelineBoard) {
    let view = board.summary();
    println!(
        "\nTurnover board ({} view): {} -> {}",
        view.mode_label, view.window_start, view.window_end
    );

    if view.rows.is_empty() {
        println!("No reservations inside this window.");
    } else {
        let width = view.dates.len();
        println!(
            "One column per day; '<' and '>' mark stays spilling past the window."
        );
        for row in &view.rows {
            let same_day = if row.same_day_turnover { " same-day" } else { "" };
            println!(
                "- {:<10} {:<22} [{}] {}{} ({} open of {})",
                row.reservation_id.0,
                row.property_name,
                placement_bar(row.placement, width),
                row.status_label,
                same_day,
                row.open_tasks,
                row.task_count
            );
        }
    }

    if view.off_window > 0 {
        println!("Off-window reservations: {}", view.off_window);
    }

    println!("Status counts");
    for entry in &view.status_counts {
        println!("- {}: {}", entry.status_label, entry.count);
    }
}

fn placement_bar(placement: IntervalPlacement, width: usize) -> String {
    if !placement.is_visible() || width == 0 {
        return ".".repeat(width);
    }

    let mut cells = vec!['.'; width];
    let start = placement.start_index.max(0) as usize;
    let end = (start + placement.span as usize).min(width);
    for cell in &mut cells[start..end] {
        *cell = '#';
    }
    if placement.starts_before_range {
        cells[0] = '<';
    }
    if placement.ends_after_range {
        cells[width - 1] = '>';
    }

    cells.into_iter().collect()
}
