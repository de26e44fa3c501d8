//! Console front end: reads commands from stdin and drives one session.
//!
//! A reader thread forwards stdin lines into the session's queue. Prompts
//! raised while a command runs take their answer from the same queue, so
//! stdin is only ever read in one place.

use std::io::{self, BufRead};
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use turtle_interp::{Confirmation, RecordingCanvas, Session, TurtleConfig, UserInterface};

const CANVAS_WIDTH: f64 = 800.0;
const CANVAS_HEIGHT: f64 = 600.0;

struct ConsoleUi {
    inbox: Rc<Receiver<String>>,
}

impl ConsoleUi {
    /// Next answer line, lowercased. `None` once stdin is closed.
    fn answer(&self) -> Option<String> {
        self.inbox.recv().ok().map(|line| line.trim().to_lowercase())
    }
}

impl UserInterface for ConsoleUi {
    fn display_message(&mut self, text: &str) {
        println!("{text}");
    }

    fn confirm(&mut self, prompt: &str) -> Confirmation {
        println!("{prompt} [d]iscard / [s]ave first / [c]ancel");
        loop {
            match self.answer().as_deref() {
                Some("d" | "discard") => return Confirmation::Discard,
                Some("s" | "save") => return Confirmation::SaveFirst,
                Some("c" | "cancel") | None => return Confirmation::Cancel,
                Some(_) => println!("Please answer d, s or c."),
            }
        }
    }

    fn report_progress(&mut self, current: usize, total: usize) {
        eprintln!("[{current}/{total}]");
    }

    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        println!("Overwrite existing file {}? [y/n]", path.display());
        matches!(self.answer().as_deref(), Some("y" | "yes"))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::INFO)
        .init();

    let (tx, rx) = mpsc::channel::<String>();
    let reader = thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    let inbox = Rc::new(rx);
    let ui = ConsoleUi {
        inbox: Rc::clone(&inbox),
    };
    let canvas = RecordingCanvas::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let mut session = Session::new(TurtleConfig::default(), canvas, ui);

    session
        .ui_mut()
        .display_message("Welcome! Type 'about' for commands.");
    session.run(&inbox);

    tracing::info!(
        segments = session.canvas().segments().count(),
        history = session.history().len(),
        "session finished"
    );
    if session.history().is_dirty() {
        println!("Exiting with unsaved changes.");
    }

    reader
        .join()
        .map_err(|_| anyhow::anyhow!("stdin reader thread panicked"))?;
    Ok(())
}
