//! Dispatcher, store and participation behaviour across a whole item
//! lifecycle.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cutie_common::test_utils::discord_fixtures::{test_channel_id, test_user_id, test_user_ids};
use cutie_common::test_utils::{init_test_logging, mock_timestamp};
use cutie_common::{MessageId, RoleId, UserId};
use cutie_scheduling::{
    cast_vote, enter_giveaway, Announcer, DeliveryError, Dispatchable, Dispatcher, Entrant,
    EntryError, Giveaway, GiveawayDraft, GiveawayOutcome, Ineligible, Poll, PollTally,
    RecordStore, Reminder, Requirements, SharedStore, TickReport, VoteError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Records every announcement and optionally fails them.
struct SpyAnnouncer<T: Dispatchable> {
    calls: Mutex<Vec<(String, T, T::Outcome)>>,
    fail: bool,
}

impl<T: Dispatchable> SpyAnnouncer<T> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<T> SpyAnnouncer<T>
where
    T: Dispatchable,
    T::Outcome: Clone,
{
    fn calls(&self) -> Vec<(String, T, T::Outcome)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T> Announcer<T> for SpyAnnouncer<T>
where
    T: Dispatchable,
    T::Outcome: Clone,
{
    async fn announce(
        &self,
        id: &str,
        item: &T,
        outcome: &T::Outcome,
    ) -> Result<(), DeliveryError> {
        self.calls
            .lock()
            .unwrap()
            .push((id.to_string(), item.clone(), outcome.clone()));
        if self.fail {
            Err(DeliveryError::DestinationGone("channel deleted".to_string()))
        } else {
            Ok(())
        }
    }
}

fn start() -> DateTime<Utc> {
    mock_timestamp(2024, 6, 1, 12, 0, 0)
}

fn reminder_store(dir: &Path) -> SharedStore<Reminder> {
    RecordStore::empty(dir.join("reminders.json")).shared()
}

fn giveaway(winner_count: u32, requirements: Requirements) -> Giveaway {
    let mut giveaway = Giveaway::new(
        GiveawayDraft {
            channel_id: test_channel_id(),
            guild_id: None,
            prize: "Nitro".to_string(),
            description: "Monthly draw".to_string(),
            winner_count,
            host_id: test_user_id(),
            requirements,
            color: 0x2F_3136,
        },
        start() + Duration::hours(1),
    )
    .unwrap();
    giveaway.attach_message(MessageId(500));
    giveaway
}

fn poll() -> Poll {
    let mut poll = Poll::new(
        test_channel_id(),
        "Lunch",
        "",
        vec!["Pizza".to_string(), "Sushi".to_string(), "Tacos".to_string()],
        start() + Duration::hours(1),
        test_user_id(),
    )
    .unwrap();
    poll.attach_message(MessageId(600));
    poll
}

fn entrant(id: UserId, roles: Vec<RoleId>) -> Entrant {
    Entrant {
        id,
        roles,
        account_created_at: start() - Duration::days(365),
    }
}

#[tokio::test]
async fn test_item_is_dispatched_at_most_once() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let store = reminder_store(dir.path());
    let reminder = Reminder::new(
        test_user_id(),
        test_channel_id(),
        "stand up",
        start(),
        Duration::seconds(30),
    )
    .unwrap();
    store.lock().await.add(reminder.id(), reminder).unwrap();

    let spy = SpyAnnouncer::<Reminder>::new();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy));

    for offset in [30, 31, 90, 3600] {
        dispatcher.tick(start() + Duration::seconds(offset)).await;
    }

    assert_eq!(spy.count(), 1);
    assert!(store.lock().await.is_empty());
}

#[tokio::test]
async fn test_nothing_is_dispatched_early() {
    let dir = tempfile::tempdir().unwrap();
    let store = reminder_store(dir.path());
    let reminder = Reminder::new(
        test_user_id(),
        test_channel_id(),
        "later",
        start(),
        Duration::minutes(5),
    )
    .unwrap();
    store.lock().await.add(reminder.id(), reminder).unwrap();

    let spy = SpyAnnouncer::<Reminder>::new();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy));

    let report = dispatcher
        .tick(start() + Duration::minutes(5) - Duration::seconds(1))
        .await;
    assert_eq!(report, TickReport::default());
    assert_eq!(spy.count(), 0);
    assert_eq!(store.lock().await.len(), 1);

    let report = dispatcher.tick(start() + Duration::minutes(5)).await;
    assert_eq!(report.delivered, 1);
}

#[tokio::test]
async fn test_failed_delivery_still_removes_item() {
    let dir = tempfile::tempdir().unwrap();
    let store = reminder_store(dir.path());
    let reminder = Reminder::new(
        test_user_id(),
        test_channel_id(),
        "gone",
        start(),
        Duration::seconds(1),
    )
    .unwrap();
    store.lock().await.add(reminder.id(), reminder).unwrap();

    let spy = SpyAnnouncer::<Reminder>::failing();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy));

    let report = dispatcher.tick(start() + Duration::seconds(1)).await;
    assert_eq!(
        report,
        TickReport {
            due: 1,
            delivered: 0,
            failed: 1
        }
    );
    assert!(store.lock().await.is_empty());

    dispatcher.tick(start() + Duration::seconds(2)).await;
    assert_eq!(spy.count(), 1);
}

#[tokio::test]
async fn test_vote_moves_and_is_counted_once() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Poll> = RecordStore::empty(dir.path().join("polls.json")).shared();
    store.lock().await.add("600", poll()).unwrap();
    let voter = test_user_id();
    let now = start();

    let first = cast_vote(&store, "600", voter, 0, || now).await.unwrap();
    assert_eq!(first.previous, None);
    let second = cast_vote(&store, "600", voter, 1, || now).await.unwrap();
    assert_eq!(second.option, "Sushi");
    assert_eq!(second.previous.as_deref(), Some("Pizza"));

    let guard = store.lock().await;
    let poll = guard.get("600").unwrap();
    assert!(!poll.voters("Pizza").unwrap().contains(&voter));
    assert!(poll.voters("Sushi").unwrap().contains(&voter));
    assert_eq!(poll.tally().total, 1);
}

#[tokio::test]
async fn test_vote_rejections_do_not_mutate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("polls.json");
    let store: SharedStore<Poll> = RecordStore::empty(&path).shared();
    store.lock().await.add("600", poll()).unwrap();
    let saved = std::fs::read_to_string(&path).unwrap();

    assert!(matches!(
        cast_vote(&store, "601", test_user_id(), 0, start).await,
        Err(VoteError::NotFound(_))
    ));
    assert!(matches!(
        cast_vote(&store, "600", test_user_id(), 3, start).await,
        Err(VoteError::UnknownOption(3))
    ));
    assert!(matches!(
        cast_vote(&store, "600", test_user_id(), 0, || start() + Duration::hours(1)).await,
        Err(VoteError::Ended)
    ));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), saved);
    assert_eq!(store.lock().await.get("600").unwrap().tally().total, 0);
}

#[tokio::test]
async fn test_duplicate_entry_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Giveaway> = RecordStore::empty(dir.path().join("giveaways.json")).shared();
    store
        .lock()
        .await
        .add("500", giveaway(1, Requirements::default()))
        .unwrap();
    let user = entrant(test_user_id(), vec![]);

    assert_eq!(enter_giveaway(&store, "500", &user, start).await.unwrap(), 1);
    assert!(matches!(
        enter_giveaway(&store, "500", &user, start).await,
        Err(EntryError::AlreadyEntered)
    ));
    assert_eq!(store.lock().await.get("500").unwrap().entries().len(), 1);
}

#[tokio::test]
async fn test_eligibility_gate() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Giveaway> = RecordStore::empty(dir.path().join("giveaways.json")).shared();
    let requirements = Requirements {
        required_role_id: Some(RoleId(10)),
        ..Requirements::default()
    };
    store
        .lock()
        .await
        .add("500", giveaway(1, requirements))
        .unwrap();

    let outsider = entrant(test_user_id(), vec![RoleId(11)]);
    assert!(matches!(
        enter_giveaway(&store, "500", &outsider, start).await,
        Err(EntryError::Ineligible(Ineligible::MissingRequiredRole(
            RoleId(10)
        )))
    ));
    assert!(store.lock().await.get("500").unwrap().entries().is_empty());

    let member = entrant(test_user_id(), vec![RoleId(10)]);
    assert!(enter_giveaway(&store, "500", &member, start).await.is_ok());
}

#[tokio::test]
async fn test_entries_close_at_due_time() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Giveaway> = RecordStore::empty(dir.path().join("giveaways.json")).shared();
    store
        .lock()
        .await
        .add("500", giveaway(1, Requirements::default()))
        .unwrap();

    let late = entrant(test_user_id(), vec![]);
    assert!(matches!(
        enter_giveaway(&store, "500", &late, || start() + Duration::hours(1)).await,
        Err(EntryError::Ended)
    ));
}

#[tokio::test]
async fn test_winner_count_is_bounded_by_entrants() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Giveaway> =
        RecordStore::empty(dir.path().join("giveaways.json")).shared();
    {
        let mut guard = store.lock().await;
        let mut single = giveaway(3, Requirements::default());
        single.enter(test_user_id());
        guard.add("500", single).unwrap();
        guard.add("501", giveaway(3, Requirements::default())).unwrap();
    }

    let spy = SpyAnnouncer::<Giveaway>::new();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy))
        .with_rng(StdRng::seed_from_u64(42));
    let report = dispatcher.tick(start() + Duration::hours(2)).await;
    assert_eq!(report.delivered, 2);

    let outcomes: Vec<(String, GiveawayOutcome)> = spy
        .calls()
        .into_iter()
        .map(|(id, _, outcome)| (id, outcome))
        .collect();
    assert_eq!(outcomes[0].0, "500");
    assert_eq!(outcomes[0].1.winners, vec![test_user_id()]);
    assert_eq!(outcomes[1].0, "501");
    assert!(!outcomes[1].1.has_winners());
}

#[tokio::test]
async fn test_poll_outcome_is_the_tally() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Poll> = RecordStore::empty(dir.path().join("polls.json")).shared();
    store.lock().await.add("600", poll()).unwrap();
    for (index, voter) in test_user_ids(3).into_iter().enumerate() {
        cast_vote(&store, "600", voter, index % 2, start).await.unwrap();
    }

    let spy = SpyAnnouncer::<Poll>::new();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy));
    dispatcher.tick(start() + Duration::hours(1)).await;

    let calls = spy.calls();
    let tally: &PollTally = &calls[0].2;
    assert_eq!(tally.total, 3);
    let votes: Vec<usize> = tally.rows.iter().map(|row| row.votes).collect();
    assert_eq!(votes, vec![2, 1, 0]);
}

#[tokio::test]
async fn test_records_survive_reload() {
    let dir = tempfile::tempdir().unwrap();

    let reminders_path = dir.path().join("reminders.json");
    let mut reminders = RecordStore::empty(&reminders_path);
    let mut expected_reminders = Vec::new();
    for (offset, text) in [(10, "stand up"), (20, "drink water"), (30, "ship it")] {
        let reminder =
            Reminder::new(test_user_id(), test_channel_id(), text, start(), Duration::seconds(offset))
                .unwrap();
        reminders.add(reminder.id(), reminder.clone()).unwrap();
        expected_reminders.push((reminder.id(), reminder));
    }

    let giveaways_path = dir.path().join("giveaways.json");
    let mut giveaways = RecordStore::empty(&giveaways_path);
    let mut gated = giveaway(
        2,
        Requirements {
            required_role_id: Some(RoleId(1)),
            min_account_age: Some(14),
            allowed_roles: vec![RoleId(2), RoleId(3)],
            excluded_roles: vec![RoleId(4)],
        },
    );
    gated.enter(UserId(77));
    gated.enter(UserId(78));
    let empty = giveaway(1, Requirements::default());
    giveaways.add("500", gated.clone()).unwrap();
    giveaways.add("501", empty.clone()).unwrap();

    let polls_path = dir.path().join("polls.json");
    let mut polls = RecordStore::empty(&polls_path);
    let mut voted = poll();
    let voters = test_user_ids(3);
    voted.vote(voters[0], 0).unwrap();
    voted.vote(voters[1], 2).unwrap();
    voted.vote(voters[2], 2).unwrap();
    polls.add("600", voted.clone()).unwrap();
    polls.add("601", poll()).unwrap();

    let reloaded: RecordStore<Reminder> = RecordStore::load(&reminders_path);
    assert_eq!(reloaded.len(), 3);
    for (id, reminder) in &expected_reminders {
        assert_eq!(reloaded.get(id), Some(reminder));
    }

    let reloaded: RecordStore<Giveaway> = RecordStore::load(&giveaways_path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("500"), Some(&gated));
    assert_eq!(reloaded.get("500").unwrap().entries(), &[UserId(77), UserId(78)]);
    assert_eq!(reloaded.get("501"), Some(&empty));

    let reloaded: RecordStore<Poll> = RecordStore::load(&polls_path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("600"), Some(&voted));
    let tacos = reloaded.get("600").unwrap().voters("Tacos").unwrap();
    assert!(tacos.contains(&voters[1]) && tacos.contains(&voters[2]));
    assert_eq!(reloaded.get("601").unwrap().tally().total, 0);
}

#[tokio::test]
async fn test_votes_and_entries_are_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let polls_path = dir.path().join("polls.json");
    let giveaways_path = dir.path().join("giveaways.json");
    let polls: SharedStore<Poll> = RecordStore::empty(&polls_path).shared();
    let giveaways: SharedStore<Giveaway> = RecordStore::empty(&giveaways_path).shared();
    polls.lock().await.add("600", poll()).unwrap();
    giveaways
        .lock()
        .await
        .add("500", giveaway(1, Requirements::default()))
        .unwrap();

    let voter = test_user_id();
    cast_vote(&polls, "600", voter, 0, start).await.unwrap();
    let on_disk: RecordStore<Poll> = RecordStore::load(&polls_path);
    assert_eq!(on_disk.get("600").unwrap().vote_of(voter), Some("Pizza"));

    cast_vote(&polls, "600", voter, 1, start).await.unwrap();
    let on_disk: RecordStore<Poll> = RecordStore::load(&polls_path);
    let poll = on_disk.get("600").unwrap();
    assert_eq!(poll.vote_of(voter), Some("Sushi"));
    assert!(!poll.voters("Pizza").unwrap().contains(&voter));

    let user = entrant(voter, vec![]);
    enter_giveaway(&giveaways, "500", &user, start).await.unwrap();
    let on_disk: RecordStore<Giveaway> = RecordStore::load(&giveaways_path);
    assert_eq!(on_disk.get("500").unwrap().entries(), &[voter]);
}

#[tokio::test]
async fn test_vote_waiting_on_the_lock_reads_time_after_acquiring_it() {
    let dir = tempfile::tempdir().unwrap();
    let store: SharedStore<Poll> = RecordStore::empty(dir.path().join("polls.json")).shared();
    store.lock().await.add("600", poll()).unwrap();
    let clock = Arc::new(Mutex::new(start()));

    let guard = store.lock().await;
    let pending = tokio::spawn({
        let store = Arc::clone(&store);
        let clock = Arc::clone(&clock);
        async move {
            cast_vote(&store, "600", test_user_id(), 0, move || *clock.lock().unwrap()).await
        }
    });
    tokio::task::yield_now().await;

    *clock.lock().unwrap() = start() + Duration::hours(1);
    drop(guard);

    assert!(matches!(pending.await.unwrap(), Err(VoteError::Ended)));
    assert_eq!(store.lock().await.get("600").unwrap().tally().total, 0);
}

#[tokio::test]
async fn test_malformed_store_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let store: RecordStore<Reminder> = RecordStore::load(&path);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_invalid_record_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reminders.json");
    std::fs::write(
        &path,
        r#"{
            "1_100": {"user_id": 1, "channel_id": 2, "message": "ok", "due_at": "2024-06-01T12:00:00Z"},
            "1_200": {"user_id": 1, "channel_id": 2, "message": "", "due_at": "2024-06-01T12:00:00Z"},
            "1_300": {"user_id": 1, "message": "no channel"}
        }"#,
    )
    .unwrap();

    let store: RecordStore<Reminder> = RecordStore::load(&path);
    assert_eq!(store.len(), 1);
    assert!(store.contains("1_100"));
}

#[tokio::test]
async fn test_reminder_due_in_one_second_is_delivered_after_two() {
    let dir = tempfile::tempdir().unwrap();
    let store = reminder_store(dir.path());
    let reminder = Reminder::new(
        test_user_id(),
        test_channel_id(),
        "tea is ready",
        Utc::now(),
        Duration::seconds(1),
    )
    .unwrap();
    store.lock().await.add(reminder.id(), reminder).unwrap();

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;

    let spy = SpyAnnouncer::<Reminder>::new();
    let mut dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&spy));
    let report = dispatcher.tick(Utc::now()).await;

    assert_eq!(report.delivered, 1);
    let calls = spy.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1.message, "tea is ready");
    assert!(store.lock().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_run_stops_on_cancellation() {
    let dir = tempfile::tempdir().unwrap();
    let store = reminder_store(dir.path());
    let spy = SpyAnnouncer::<Reminder>::new();
    let shutdown = tokio_util::sync::CancellationToken::new();

    let handle = tokio::spawn(
        Dispatcher::new(store, spy).run(std::time::Duration::from_secs(60), shutdown.clone()),
    );
    tokio::time::sleep(std::time::Duration::from_secs(61)).await;
    shutdown.cancel();

    handle.await.unwrap();
}
