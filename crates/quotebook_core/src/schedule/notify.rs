//! Notification payloads and the delivery seam.
//!
//! # Invariants
//! - A notification is a title + body pair; nothing is read back.
//! - Picking the quote never records it to history.

use crate::model::quote::Quote;
use crate::store::quote_store::QuoteStore;
use log::{error, info};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NOTIFICATION_TITLE: &str = "Daily Motivation";

#[derive(Debug)]
pub enum NotifyError {
    /// The catalog had nothing to show.
    NoQuote,
    Delivery(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoQuote => write!(f, "no quote available for notification"),
            Self::Delivery(message) => write!(f, "notification delivery failed: {message}"),
        }
    }
}

impl Error for NotifyError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_quote(quote: &Quote) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: quote.attributed(),
        }
    }
}

/// Sink for user-facing notifications (OS facility, terminal, test recorder).
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Picks a random quote from `store` and delivers it through `notifier`.
///
/// Returns the delivered quote so callers may record it.
pub fn fire<'a, N, R>(
    store: &'a QuoteStore,
    notifier: &N,
    rng: &mut R,
) -> Result<&'a Quote, NotifyError>
where
    N: Notifier + ?Sized,
    R: Rng + ?Sized,
{
    let quote = store.random_quote(rng).ok_or(NotifyError::NoQuote)?;
    let notification = Notification::for_quote(quote);
    match notifier.notify(&notification) {
        Ok(()) => {
            info!("event=notification_fire module=schedule status=ok");
            Ok(quote)
        }
        Err(err) => {
            error!("event=notification_fire module=schedule status=error error={err}");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{fire, Notification, Notifier, NotifyError, NOTIFICATION_TITLE};
    use crate::model::quote::Quote;
    use crate::store::quote_store::QuoteStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        sent: RefCell<Vec<Notification>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.sent.borrow_mut().push(notification.clone());
            Ok(())
        }
    }

    struct Broken;

    impl Notifier for Broken {
        fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Delivery("no display".to_string()))
        }
    }

    #[test]
    fn fire_delivers_title_and_attributed_body() {
        let store = QuoteStore::new(vec![Quote::new("Be bold", "A", "courage").unwrap()]);
        let recorder = Recorder::default();
        let mut rng = StdRng::seed_from_u64(3);

        let quote = fire(&store, &recorder, &mut rng).unwrap();
        assert_eq!(quote.text, "Be bold");

        let sent = recorder.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, NOTIFICATION_TITLE);
        assert_eq!(sent[0].body, "\"Be bold\" - A");
    }

    #[test]
    fn fire_reports_empty_catalog_and_delivery_errors() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty = QuoteStore::default();
        assert!(matches!(
            fire(&empty, &Recorder::default(), &mut rng),
            Err(NotifyError::NoQuote)
        ));

        let store = QuoteStore::new(vec![Quote::new("Be bold", "A", "courage").unwrap()]);
        assert!(matches!(
            fire(&store, &Broken, &mut rng),
            Err(NotifyError::Delivery(_))
        ));
    }
}
