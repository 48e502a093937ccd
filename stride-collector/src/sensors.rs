//! Simulated wrist sensors for running the telemetry task on a host.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stride_osal_std::time::Time;
use stride_telemetry::{Sensors, SetupNotReady, Tag, TaggedValueStore};

/// Produces plausible readings for a runner, failing setup a configurable number of times first.
#[derive(Debug)]
pub struct SimulatedSensors {
    setup_failures: u32,
    rng: StdRng,
    steps: u64,
    battery: f32,
}

impl SimulatedSensors {
    pub fn new(setup_failures: u32) -> Self {
        Self {
            setup_failures,
            rng: StdRng::from_rng(&mut rand::rng()),
            steps: 0,
            battery: 100.0,
        }
    }
}

impl Sensors for SimulatedSensors {
    async fn setup(&mut self) -> Result<(), SetupNotReady> {
        if self.setup_failures > 0 {
            self.setup_failures -= 1;
            return Err(SetupNotReady::new(format!(
                "optical sensor warming up, {} more attempts",
                self.setup_failures
            )));
        }
        tracing::debug!("simulated sensors ready");
        Ok(())
    }

    async fn collect(&mut self, store: &TaggedValueStore) {
        let speed_kmh: f32 = self.rng.random_range(8.0..14.0);
        let pace_secs = (3600.0 / speed_kmh) as u32;

        self.steps += self.rng.random_range(2..4);
        self.battery = (self.battery - 0.05).max(0.0);

        store.insert::<Time>(Tag::Heartrate, self.rng.random_range(120..175_u32).to_string());
        store.insert::<Time>(Tag::Speed, format!("{speed_kmh:.1}"));
        store.insert::<Time>(Tag::Pace, format!("{}:{:02}", pace_secs / 60, pace_secs % 60));
        store.insert::<Time>(Tag::Climb, self.rng.random_range(-2..=3_i32).to_string());
        store.insert::<Time>(Tag::Steps, self.steps.to_string());
        store.insert::<Time>(Tag::Battery, format!("{:.0}", self.battery));
    }
}

#[cfg(test)]
mod tests {
    use stride_telemetry::{Sensors, Tag, TaggedValueStore};

    use super::SimulatedSensors;

    #[tokio::test(flavor = "current_thread")]
    async fn fails_setup_the_configured_number_of_times() {
        let mut sensors = SimulatedSensors::new(2);

        assert!(sensors.setup().await.is_err());
        assert!(sensors.setup().await.is_err());
        assert!(sensors.setup().await.is_ok());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn collect_writes_every_tag() {
        let mut sensors = SimulatedSensors::new(0);
        let store = TaggedValueStore::with_name("wrist");

        sensors.collect(&store).await;
        let first_steps: u64 = store.get(Tag::Steps).unwrap().value().parse().unwrap();
        sensors.collect(&store).await;
        let second_steps: u64 = store.get(Tag::Steps).unwrap().value().parse().unwrap();

        assert_eq!(store.len(), Tag::COUNT);
        assert!(second_steps > first_steps);
        assert!(store.get(Tag::Pace).unwrap().value().contains(':'));
    }
}
