use goodeats_shared::clients::rabbitmq::RabbitMQClient;
use goodeats_shared::types::event::{payloads, routing_keys, Event};

use crate::ledger::SubmitOutcome;
use crate::models;

const SOURCE: &str = "goodeats-events";

pub async fn publish_event_created(rabbitmq: &RabbitMQClient, event: &models::Event) {
    let envelope = Event::new(
        SOURCE,
        routing_keys::EVENTS_EVENT_CREATED,
        payloads::EventCreated {
            event_id: event.id,
            host_id: event.host_id,
            title: event.title.clone(),
            category: event.category.clone(),
            date: event.date,
        },
    )
    .with_user(event.host_id);

    rabbitmq.publish_or_log(routing_keys::EVENTS_EVENT_CREATED, &envelope).await;
}

pub async fn publish_event_updated(rabbitmq: &RabbitMQClient, event: &models::Event) {
    let envelope = Event::new(
        SOURCE,
        routing_keys::EVENTS_EVENT_UPDATED,
        payloads::EventUpdated {
            event_id: event.id,
            host_id: event.host_id,
        },
    )
    .with_user(event.host_id);

    rabbitmq.publish_or_log(routing_keys::EVENTS_EVENT_UPDATED, &envelope).await;
}

pub async fn publish_rsvp_submitted(rabbitmq: &RabbitMQClient, outcome: &SubmitOutcome) {
    let rsvp = &outcome.rsvp;
    let envelope = Event::new(
        SOURCE,
        routing_keys::EVENTS_RSVP_SUBMITTED,
        payloads::RsvpSubmitted {
            rsvp_id: rsvp.id,
            event_id: rsvp.event_id,
            user_id: rsvp.user_id,
            status: rsvp.status.clone(),
            guests_count: rsvp.guests_count,
            created: outcome.created,
            current_attendees: outcome.current_attendees,
        },
    )
    .with_user(rsvp.user_id);

    rabbitmq.publish_or_log(routing_keys::EVENTS_RSVP_SUBMITTED, &envelope).await;
}
