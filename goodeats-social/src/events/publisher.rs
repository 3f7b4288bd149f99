use uuid::Uuid;

use goodeats_shared::clients::rabbitmq::RabbitMQClient;
use goodeats_shared::types::event::{payloads, routing_keys, Event};

use crate::models::{Comment, Post};

const SOURCE: &str = "goodeats-social";

pub async fn publish_post_created(rabbitmq: &RabbitMQClient, post: &Post) {
    let event = Event::new(
        SOURCE,
        routing_keys::SOCIAL_POST_CREATED,
        payloads::PostCreated {
            post_id: post.id,
            user_id: post.user_id,
            event_id: post.event_id,
        },
    )
    .with_user(post.user_id);

    rabbitmq.publish_or_log(routing_keys::SOCIAL_POST_CREATED, &event).await;
}

pub async fn publish_post_liked(rabbitmq: &RabbitMQClient, post_id: Uuid, liker_id: Uuid, author_id: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::SOCIAL_POST_LIKED,
        payloads::PostLiked { post_id, liker_id, author_id },
    )
    .with_user(liker_id);

    rabbitmq.publish_or_log(routing_keys::SOCIAL_POST_LIKED, &event).await;
}

pub async fn publish_comment_created(rabbitmq: &RabbitMQClient, comment: &Comment, author_id: Uuid) {
    let event = Event::new(
        SOURCE,
        routing_keys::SOCIAL_COMMENT_CREATED,
        payloads::CommentCreated {
            comment_id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            author_id,
        },
    )
    .with_user(comment.user_id);

    rabbitmq.publish_or_log(routing_keys::SOCIAL_COMMENT_CREATED, &event).await;
}
