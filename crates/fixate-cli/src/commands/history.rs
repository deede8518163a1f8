use fixate_core::{DayCell, FileStore, Session};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(FileStore::open()?);
    print_week(&session.week());
    Ok(())
}

/// Two-row strip: weekday letters over completion marks, oldest first.
pub fn print_week(cells: &[DayCell]) {
    let labels: Vec<String> = cells.iter().map(|c| c.label.to_string()).collect();
    let marks: Vec<String> = cells
        .iter()
        .map(|c| if c.completed { "x" } else { "." }.to_string())
        .collect();
    println!("{}", labels.join(" "));
    println!("{}", marks.join(" "));
}
