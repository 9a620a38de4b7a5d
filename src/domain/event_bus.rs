//! Fan-out of dashboard events to connected clients.
//!
//! Battery and alert saves are published once; every open
//! `/ws/dashboard` socket holds its own receiver and gets a copy. There is
//! a single dashboard group, so nothing is routed or filtered here.

use tokio::sync::broadcast;

use super::DashboardEvent;

/// Dashboard event channel shared by the services and the WebSocket layer.
///
/// Cloning is cheap and every clone publishes into the same channel. A
/// receiver that falls more than `capacity` events behind loses the
/// oldest ones and sees `RecvError::Lagged` on its next read.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Creates a bus holding up to `capacity` undelivered events per
    /// receiver. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every connected dashboard and returns how many
    /// received it. With no dashboards open the event is discarded and 0 is
    /// returned.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => 0,
        }
    }

    /// Opens a receiver for a newly connected dashboard. It sees events
    /// published from now on, not earlier ones.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Number of dashboards currently subscribed.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::BatteryId;
    use crate::domain::battery::fixtures::new_battery;

    fn make_event(id: i64) -> DashboardEvent {
        let battery = new_battery(&format!("BAT-{id}")).into_battery(BatteryId::new(id), Utc::now());
        DashboardEvent::battery(&battery, true)
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        assert_eq!(bus.publish(make_event(1)), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.publish(make_event(1));

        let Ok(event) = rx.recv().await else {
            panic!("expected to receive event");
        };
        assert_eq!(event.event_type_str(), "battery_update");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        assert_eq!(bus.publish(make_event(4)), 2);

        let Ok(DashboardEvent::BatteryUpdate { battery: b1, .. }) = rx1.recv().await else {
            panic!("rx1 failed");
        };
        let Ok(DashboardEvent::BatteryUpdate { battery: b2, .. }) = rx2.recv().await else {
            panic!("rx2 failed");
        };
        assert_eq!(b1.id, b2.id);
    }

    #[tokio::test]
    async fn lagging_receiver_reports_skipped_events() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        for id in 0..5 {
            bus.publish(make_event(id));
        }
        let Err(broadcast::error::RecvError::Lagged(skipped)) = rx.recv().await else {
            panic!("expected lag");
        };
        assert_eq!(skipped, 3);
    }

    #[tokio::test]
    async fn zero_capacity_still_delivers() {
        let bus = EventBus::new(0);
        let mut rx = bus.subscribe();
        assert_eq!(bus.publish(make_event(7)), 1);
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
