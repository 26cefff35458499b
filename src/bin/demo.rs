use forum_ideas::events::{
    HostEvent, OnlineLocation, PostButtons, PostData, PostRowRender, PostSubmitted, PostingMode,
    QuickmodDisplay, TopicListing, TopicView,
};
use forum_ideas::language::BundledLanguage;
use forum_ideas::listener::IdeasListener;
use forum_ideas::services::{
    CollectingTemplate, DataBag, InMemoryAuth, InMemoryIdeas, RecordingRouter, SessionUser,
    StaticLinks,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let mut settings = DataBag::new();
    settings.set("ideas_forum_id", 2);
    let ideas_forum_id = settings
        .require_int("ideas_forum_id")
        .expect("ideas_forum_id must be configured");

    let user = SessionUser {
        id: 7,
        name: String::from("demo"),
        language: String::from("en"),
    };
    let ideas = InMemoryIdeas::new_with_sample();
    let template = CollectingTemplate::default();
    let auth = InMemoryAuth::default();
    auth.grant_moderator(user.id, ideas_forum_id);

    let listener = IdeasListener::new(
        auth,
        settings,
        RecordingRouter::default(),
        ideas,
        BundledLanguage::for_user(&user),
        StaticLinks::default(),
        template.clone(),
        user,
        "php",
    );

    let mut events = vec![
        HostEvent::TopicListing(TopicListing { forum_id: 2 }),
        HostEvent::PostRowRender(PostRowRender {
            forum_id: 2,
            post_id: 1,
            topic_first_post_id: 1,
            buttons: PostButtons::default(),
        }),
        HostEvent::TopicView(TopicView {
            forum_id: 2,
            topic_id: 1,
            page_title: String::from("Allow wider signatures"),
        }),
        HostEvent::QuickmodDisplay(QuickmodDisplay {
            forum_id: 2,
            ..QuickmodDisplay::default()
        }),
        HostEvent::OnlineLocation(OnlineLocation {
            on_page: (String::from("app"), String::from("app")),
            session_page: String::from("app.php/ideas"),
            ..OnlineLocation::default()
        }),
        HostEvent::PostSubmitted(PostSubmitted {
            mode: PostingMode::Edit,
            forum_id: 2,
            topic_id: 1,
            post_id: 1,
            update_subject: true,
            data: PostData {
                topic_first_post_id: 1,
                post_subject: String::from("Allow much wider signatures"),
            },
        }),
    ];

    for event in &mut events {
        let name = event.name();
        let flow = listener
            .dispatch(event)
            .expect("dispatch failed on a well-formed payload");
        info!(event = name, ?flow, "dispatched");
    }

    info!(vars = ?template.vars(), "template vars after dispatch");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
