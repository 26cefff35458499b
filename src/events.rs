use std::collections::BTreeMap;

/// Host hooks the listener subscribes to, paired with the handler that
/// services each one. Registration order is part of the contract with
/// the host dispatcher.
pub const SUBSCRIBED_EVENTS: [(&str, &str); 6] = [
    ("viewforum_get_topic_data", "ideas_forum_redirect"),
    ("viewtopic_modify_post_row", "show_post_buttons"),
    ("viewtopic_modify_page_title", "show_idea"),
    ("viewtopic_add_quickmod_option_before", "adjust_quickmod_tools"),
    ("viewonline_overwrite_location", "viewonline_ideas"),
    ("posting_modify_submit_post_after", "edit_idea_title"),
];

/// What the dispatch loop should do once a handler returns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Redirect(String),
}

impl Flow {
    pub fn is_redirect(&self) -> bool {
        matches!(self, Flow::Redirect(_))
    }
}

/// viewforum is about to render a forum's topic list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopicListing {
    pub forum_id: i64,
}

/// Per-post action flags rendered under each post.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PostButtons {
    pub edit: bool,
    pub delete: bool,
    pub report: bool,
    pub warn: bool,
    pub info: bool,
    pub quote: bool,
}

impl Default for PostButtons {
    fn default() -> Self {
        Self {
            edit: true,
            delete: true,
            report: true,
            warn: true,
            info: true,
            quote: true,
        }
    }
}

/// viewtopic is about to render one post row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostRowRender {
    pub forum_id: i64,
    pub post_id: i64,
    pub topic_first_post_id: i64,
    pub buttons: PostButtons,
}

/// viewtopic is assembling the page title; the hook point where idea
/// details get attached to the topic view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopicView {
    pub forum_id: i64,
    pub topic_id: i64,
    pub page_title: String,
}

/// Quick-moderation tools offered on a topic view, keyed by tool name
/// and, per tool, by topic id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuickmodTools {
    tools: BTreeMap<String, BTreeMap<i64, bool>>,
}

impl QuickmodTools {
    pub fn offer(&mut self, tool: &str, topic_id: i64, enabled: bool) {
        self.tools
            .entry(tool.to_string())
            .or_default()
            .insert(topic_id, enabled);
    }

    pub fn is_offered(&self, tool: &str, topic_id: i64) -> bool {
        self.tools
            .get(tool)
            .and_then(|topics| topics.get(&topic_id))
            .copied()
            .unwrap_or(false)
    }

    /// Withdraws a tool for every topic it is currently offered on.
    /// Tools the host never offered are not inserted.
    pub fn suppress(&mut self, tool: &str) {
        if let Some(topics) = self.tools.get_mut(tool) {
            for enabled in topics.values_mut() {
                *enabled = false;
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }
}

/// viewtopic is about to render the quick-moderation dropdown.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuickmodDisplay {
    pub forum_id: i64,
    pub tools: QuickmodTools,
}

/// One row of the "who's online" listing. `on_page.1` is the host's
/// page-type token (`index`, `app`, `viewtopic`, ...); `session_forum_id`
/// is 0 when the session is not inside a forum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OnlineLocation {
    pub on_page: (String, String),
    pub session_page: String,
    pub session_forum_id: i64,
    pub location: String,
    pub location_url: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PostingMode {
    Post,
    Reply,
    Quote,
    Edit,
}

/// Fields of the submitted post relevant after the host persisted it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostData {
    pub topic_first_post_id: i64,
    pub post_subject: String,
}

/// The posting form was submitted and the host finished persisting.
#[derive(Clone, Debug, PartialEq)]
pub struct PostSubmitted {
    pub mode: PostingMode,
    pub forum_id: i64,
    pub topic_id: i64,
    pub post_id: i64,
    pub update_subject: bool,
    pub data: PostData,
}

/// One typed variant per subscribed host event.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    TopicListing(TopicListing),
    PostRowRender(PostRowRender),
    TopicView(TopicView),
    QuickmodDisplay(QuickmodDisplay),
    OnlineLocation(OnlineLocation),
    PostSubmitted(PostSubmitted),
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::TopicListing(_) => "viewforum_get_topic_data",
            HostEvent::PostRowRender(_) => "viewtopic_modify_post_row",
            HostEvent::TopicView(_) => "viewtopic_modify_page_title",
            HostEvent::QuickmodDisplay(_) => "viewtopic_add_quickmod_option_before",
            HostEvent::OnlineLocation(_) => "viewonline_overwrite_location",
            HostEvent::PostSubmitted(_) => "posting_modify_submit_post_after",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quickmod_suppress_withdraws_every_topic() {
        let mut tools = QuickmodTools::default();
        tools.offer("delete_topic", 1, true);
        tools.offer("delete_topic", 2, true);
        tools.offer("lock", 1, true);
        tools.suppress("delete_topic");
        assert!(!tools.is_offered("delete_topic", 1));
        assert!(!tools.is_offered("delete_topic", 2));
        assert!(tools.is_offered("lock", 1));
    }

    #[test]
    fn quickmod_suppress_ignores_unoffered_tools() {
        let mut tools = QuickmodTools::default();
        tools.suppress("fork");
        assert_eq!(tools.names().count(), 0);
        assert!(!tools.is_offered("fork", 1));
    }

    #[test]
    fn event_names_match_the_subscription_table() {
        let events = [
            HostEvent::TopicListing(TopicListing::default()),
            HostEvent::PostRowRender(PostRowRender::default()),
            HostEvent::TopicView(TopicView::default()),
            HostEvent::QuickmodDisplay(QuickmodDisplay::default()),
            HostEvent::OnlineLocation(OnlineLocation::default()),
            HostEvent::PostSubmitted(PostSubmitted {
                mode: PostingMode::Post,
                forum_id: 0,
                topic_id: 0,
                post_id: 0,
                update_subject: false,
                data: PostData::default(),
            }),
        ];
        for (event, (name, _)) in events.iter().zip(SUBSCRIBED_EVENTS) {
            assert_eq!(event.name(), name);
        }
    }
}
