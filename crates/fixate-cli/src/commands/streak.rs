use fixate_core::{FileStore, Session};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::new(FileStore::open()?);
    println!("{} day streak", session.streak());
    Ok(())
}
