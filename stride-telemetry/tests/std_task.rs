//! The telemetry task on the std OSAL.

use std::time::Instant;

use stride_osal_api::time::Duration;
use stride_osal_std::task::{Spawner, TaskConfig};
use stride_osal_std::time::Time;
use stride_telemetry::codec::encode;
use stride_telemetry::{
    InitError, LifecycleConfig, LifecycleState, LifecycleStatus, Sensors, SetupNotReady, Tag,
    TaggedValueStore, TaskLifecycle, TelemetryTask,
};

struct CountingSensors {
    setup_failures: u32,
    beats: u32,
}

impl Sensors for CountingSensors {
    async fn setup(&mut self) -> Result<(), SetupNotReady> {
        if self.setup_failures > 0 {
            self.setup_failures -= 1;
            return Err(SetupNotReady::new("heart rate monitor still booting"));
        }
        Ok(())
    }

    async fn collect(&mut self, store: &TaggedValueStore) {
        self.beats += 1;
        store.insert::<Time>(Tag::Heartrate, (60 + self.beats).to_string());
        store.insert::<Time>(Tag::Battery, "97");
    }
}

fn wait_for(status: &LifecycleStatus, done: impl Fn(LifecycleState) -> bool) -> LifecycleState {
    let deadline = Instant::now() + std::time::Duration::from_secs(10);
    loop {
        let state = status.get();
        if done(state) {
            return state;
        }
        assert!(Instant::now() < deadline, "stuck in {state:?}");
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
}

fn fast_task(setup_failures: u32) -> TelemetryTask<Time, CountingSensors> {
    let lifecycle = TaskLifecycle::<Time, _>::new(
        CountingSensors {
            setup_failures,
            beats: 0,
        },
        TaggedValueStore::with_name("wrist"),
    )
    .with_config(
        LifecycleConfig::new()
            .with_setup_retry(Duration::from_millis(10))
            .with_collect_interval(Duration::from_millis(10)),
    );
    TelemetryTask::new(lifecycle, TaskConfig::new("TELEMETRY-TEST"))
}

#[test]
fn collects_on_its_own_thread_until_stopped() {
    let mut task = fast_task(2);
    let status = task.status();
    let store = task.store();
    let stop = task.stop_handle().unwrap();

    let handle = task.init(&Spawner).unwrap();
    assert!(matches!(
        task.init(&Spawner),
        Err(InitError::AlreadyInitialized)
    ));

    wait_for(&status, |state| {
        matches!(state, LifecycleState::Running { iterations } if iterations >= 3)
    });

    let document = encode(&store);
    let entries = document["wrist"].as_object().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["battery"]["val"], "97");
    assert!(entries["heartrate"]["ts"].as_i64().unwrap() > 1_577_836_800);

    stop.stop();
    handle.join().unwrap();

    let LifecycleState::Running { iterations } = status.get() else {
        panic!("task stopped outside of running state");
    };
    assert_eq!(
        store.get(Tag::Heartrate).unwrap().value(),
        (60 + iterations).to_string()
    );
}

#[test]
fn stop_while_retrying_setup() {
    let mut task = fast_task(u32::MAX);
    let status = task.status();
    let stop = task.stop_handle().unwrap();

    let handle = task.init(&Spawner).unwrap();
    wait_for(&status, |state| {
        matches!(state, LifecycleState::RetryingSetup { attempts } if attempts >= 2)
    });

    stop.stop();
    handle.join().unwrap();

    assert!(task.store().is_empty());
}
