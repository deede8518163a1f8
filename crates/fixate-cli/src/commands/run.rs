use std::io::{BufRead, Write};
use std::time::Duration;

use fixate_core::{format_time, FileStore, Session, SessionRuntime, TokioTickScheduler};

use super::history::print_week;

pub async fn run(minutes: Option<u32>, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(FileStore::open()?);
    if let Some(minutes) = minutes {
        session.select_duration(minutes)?;
    }

    let needs_confirmation = session.requires_first_start_confirmation();
    let mut runtime = SessionRuntime::new(session, TokioTickScheduler::new());

    let started = if needs_confirmation {
        if !yes && !confirm_first_start()? {
            println!("Not starting.");
            return Ok(());
        }
        runtime.confirm_first_start()
    } else {
        runtime.start()
    };
    if started.is_none() {
        return Err("session did not start".into());
    }

    // Read-side refresh; the countdown itself runs on the armed schedule.
    let mut display = tokio::time::interval(Duration::from_millis(250));
    loop {
        display.tick().await;
        let snap = runtime.snapshot();
        if !snap.is_running {
            print!("\r{}  ", format_time(0));
            break;
        }
        print!("\r{}  ", format_time(snap.remaining_secs));
        std::io::stdout().flush()?;
    }
    println!();

    let snap = runtime.snapshot();
    println!("Session complete. {} day streak.", snap.streak);
    print_week(&runtime.week());
    Ok(())
}

fn confirm_first_start() -> std::io::Result<bool> {
    print!("First visit. Start your first focus session? [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
