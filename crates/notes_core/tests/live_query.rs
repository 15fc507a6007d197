use notes_core::{DbError, Note, NoteDao, NoteDatabase, Subscription};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

const EMIT_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

fn dao() -> NoteDao {
    NoteDao::new(NoteDatabase::open_in_memory().unwrap())
}

fn collect(query: &notes_core::LiveQuery) -> (Subscription, mpsc::UnboundedReceiver<Vec<Note>>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let subscription = query.observe(move |notes| {
        let _ = tx.send(notes);
    });
    (subscription, rx)
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Vec<Note>>) -> Vec<Note> {
    timeout(EMIT_TIMEOUT, rx.recv())
        .await
        .expect("observer should emit")
        .expect("observer channel should stay open")
}

fn titles(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(|note| note.title.as_str()).collect()
}

#[tokio::test]
async fn observer_receives_initial_result_even_when_empty() {
    let dao = dao();
    let (_subscription, mut rx) = collect(&dao.query_all());

    assert!(next(&mut rx).await.is_empty());
}

#[tokio::test]
async fn observer_receives_full_result_after_each_write() {
    let dao = dao();
    let (subscription, mut rx) = collect(&dao.query_all());
    assert!(next(&mut rx).await.is_empty());

    let milk = dao.insert(&Note::new("Milk", "2%")).await.unwrap();
    assert_eq!(titles(&next(&mut rx).await), vec!["Milk"]);

    dao.insert(&Note::new("Bread", "")).await.unwrap();
    assert_eq!(titles(&next(&mut rx).await), vec!["Milk", "Bread"]);

    dao.delete(&Note::with_id(milk, "Milk", "2%")).await.unwrap();
    assert_eq!(titles(&next(&mut rx).await), vec!["Bread"]);
    assert!(subscription.is_active());
}

#[tokio::test]
async fn write_is_visible_to_the_next_observation() {
    let dao = dao();
    dao.insert(&Note::new("before", "")).await.unwrap();

    let (_subscription, mut rx) = collect(&dao.query_all());
    assert_eq!(titles(&next(&mut rx).await), vec!["before"]);
}

#[tokio::test]
async fn search_observer_ignores_changes_outside_its_result() {
    let dao = dao();
    let (_subscription, mut rx) = collect(&dao.search("%choc%"));
    assert!(next(&mut rx).await.is_empty());

    dao.insert(&Note::new("Groceries", "chocolate")).await.unwrap();
    assert!(timeout(QUIET_PERIOD, rx.recv()).await.is_err());

    dao.insert(&Note::new("Chocolate mousse", "")).await.unwrap();
    assert_eq!(titles(&next(&mut rx).await), vec!["Chocolate mousse"]);
}

#[tokio::test]
async fn no_callback_after_cancel() {
    let dao = dao();
    let (mut subscription, mut rx) = collect(&dao.query_all());
    assert!(next(&mut rx).await.is_empty());

    subscription.cancel();
    assert!(!subscription.is_active());
    dao.insert(&Note::new("unseen", "")).await.unwrap();

    // The callback owned the sender; cancelling dropped it.
    assert!(timeout(EMIT_TIMEOUT, rx.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn dropping_subscription_cancels_it() {
    let dao = dao();
    let (subscription, mut rx) = collect(&dao.query_all());
    assert!(next(&mut rx).await.is_empty());

    drop(subscription);
    dao.insert(&Note::new("unseen", "")).await.unwrap();

    assert!(timeout(EMIT_TIMEOUT, rx.recv()).await.unwrap().is_none());
}

#[tokio::test]
async fn independent_observers_each_receive_updates() {
    let dao = dao();
    let (_all, mut all_rx) = collect(&dao.query_all());
    let (_search, mut search_rx) = collect(&dao.search("%tea%"));
    assert!(next(&mut all_rx).await.is_empty());
    assert!(next(&mut search_rx).await.is_empty());

    dao.insert(&Note::new("Green tea", "")).await.unwrap();

    assert_eq!(titles(&next(&mut all_rx).await), vec!["Green tea"]);
    assert_eq!(titles(&next(&mut search_rx).await), vec!["Green tea"]);
}

#[tokio::test]
async fn write_reaches_observers_when_caller_stops_waiting() {
    let dao = dao();
    let (_subscription, mut rx) = collect(&dao.query_all());
    assert!(next(&mut rx).await.is_empty());

    // Keep the connection busy so the insert is still pending when dropped.
    let holder_db = dao.database().clone();
    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let holder = std::thread::spawn(move || {
        holder_db.with_connection(|_conn| {
            locked_tx.send(()).unwrap();
            std::thread::sleep(Duration::from_millis(200));
            Ok::<_, DbError>(())
        })
    });
    locked_rx.recv().unwrap();

    let note = Note::new("fire and forget", "");
    let finished = tokio::select! {
        biased;
        _ = dao.insert(&note) => true,
        _ = std::future::ready(()) => false,
    };
    assert!(!finished);
    holder.join().unwrap().unwrap();

    assert_eq!(titles(&next(&mut rx).await), vec!["fire and forget"]);
}

#[tokio::test]
async fn callback_can_cancel_its_own_subscription() {
    let dao = dao();
    let own_subscription: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let slot = Arc::clone(&own_subscription);
    let subscription = dao.query_all().observe(move |notes: Vec<Note>| {
        let tear_down = !notes.is_empty();
        let _ = tx.send(notes);
        if tear_down {
            let taken = slot.lock().unwrap().take();
            if let Some(mut subscription) = taken {
                subscription.cancel();
                assert!(!subscription.is_active());
            }
        }
    });
    *own_subscription.lock().unwrap() = Some(subscription);
    assert!(next(&mut rx).await.is_empty());

    dao.insert(&Note::new("first", "")).await.unwrap();
    assert_eq!(titles(&next(&mut rx).await), vec!["first"]);

    dao.insert(&Note::new("second", "")).await.unwrap();
    assert!(timeout(EMIT_TIMEOUT, rx.recv()).await.unwrap().is_none());
    assert!(own_subscription.lock().unwrap().is_none());
}
