use neighborhood_map_core::{NoticeLevel, PlaceId, ViewSnapshot, ViewUpdate};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

/// Reads view updates from the controller's bus and prints them.
pub struct TerminalView {
    updates: broadcast::Receiver<ViewUpdate>,
    json: bool,
    latest: Option<ViewSnapshot>,
}

impl TerminalView {
    pub fn new(updates: broadcast::Receiver<ViewUpdate>, json: bool) -> Self {
        Self {
            updates,
            json,
            latest: None,
        }
    }

    /// Drains pending updates, printing every notice and the final snapshot.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        let mut last = None;
        loop {
            match self.updates.try_recv() {
                Ok(update) => {
                    if let Some(notice) = &update.notice {
                        if !self.json {
                            match notice.level {
                                NoticeLevel::Info => println!("note: {}", notice.text),
                                NoticeLevel::Error => eprintln!("error: {}", notice.text),
                            }
                        }
                    }
                    if self.json {
                        println!("{}", serde_json::to_string(&update)?);
                    }
                    last = Some(update);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "view fell behind");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if let Some(update) = last {
            if !self.json {
                print_snapshot(&update.snapshot);
            }
            self.latest = Some(update.snapshot);
        }
        Ok(())
    }

    /// Maps a 1-based list position to the place shown there.
    pub fn place_at(&self, position: usize) -> Option<PlaceId> {
        let snapshot = self.latest.as_ref()?;
        position
            .checked_sub(1)
            .and_then(|index| snapshot.places.get(index))
            .map(|place| place.id)
    }
}

pub fn print_snapshot(snapshot: &ViewSnapshot) {
    if let Some(resolved) = snapshot.resolved {
        println!("address: {} ({resolved})", snapshot.address);
    }

    if snapshot.visibility.results || !snapshot.list_title.is_empty() {
        println!("{}", snapshot.list_title);
        for (index, place) in snapshot.places.iter().enumerate() {
            let marker = if place.selected { '*' } else { ' ' };
            println!(
                "{marker}{:>3}. {} [{}]",
                index + 1,
                place.name,
                place.coordinates
            );
        }
        if !snapshot.list_footer.is_empty() && !snapshot.places.is_empty() {
            println!("{}", snapshot.list_footer);
        }
    }

    if snapshot.visibility.snippet {
        match &snapshot.article_header {
            Some(header) => println!("{header}"),
            None => println!("Looking up articles..."),
        }
        for article in &snapshot.articles {
            println!("  {}: {}", article.title, article.description);
            println!("  {}", article.url);
        }
    }
}
