//! Interactive mode selection.

use std::io::{self, BufRead, Write};

/// The five things the tool can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    MonitorOne,
    ChartOne,
    ListAll,
    ConnectStrongest,
    ChartAll,
}

impl Mode {
    /// Map a menu choice (`"1"`..`"5"`).
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Mode::MonitorOne),
            "2" => Some(Mode::ChartOne),
            "3" => Some(Mode::ListAll),
            "4" => Some(Mode::ConnectStrongest),
            "5" => Some(Mode::ChartAll),
            _ => None,
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Mode::MonitorOne => "Displaying WiFi Signal Strength...",
            Mode::ChartOne => "Plotting WiFi Signal Strength Over Time...",
            Mode::ListAll => "Discovering Active WiFi Networks...",
            Mode::ConnectStrongest => "Connecting to the Strongest WiFi Network...",
            Mode::ChartAll => "Displaying Signal Strengths of All WiFi Networks Over Time...",
        }
    }
}

/// Print the menu and read one choice from stdin.
pub fn prompt() -> io::Result<Option<Mode>> {
    println!("Choose an option:");
    println!("1: Display Signal Strength and Distance of the Access Point you're Connecting to");
    println!("2: View Signal Strength of the Access Point you're Connecting to Over Time");
    println!("3: Discover Active WiFi Networks");
    println!("4: Connect to the Strongest WiFi Network");
    println!("5: Display All WiFi Signals");
    print!("Enter 1, 2, 3, 4, or 5: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(Mode::from_choice(&line))
}
