use crate::events::{
    Flow, HostEvent, OnlineLocation, PostRowRender, PostSubmitted, PostingMode, QuickmodDisplay,
    TopicListing, TopicView,
};
use crate::services::{
    Authorizer, DataBag, IdeaStore, Language, LinkHelper, RouteHelper, ServiceResult, SessionUser,
    Template,
};
use crate::templates::idea_template::render_idea_panel;
use serde_json::{json, Value};
use tracing::debug;

pub const IDEAS_INDEX_ROUTE: &str = "ideas_index_controller";

/// Quick-mod tools that must never apply to idea topics. Deleting,
/// restoring or re-categorizing an idea topic would detach it from its
/// idea record; locking, moving and merging stay available.
const SUPPRESSED_QUICKMOD_TOOLS: [&str; 6] = [
    "delete_topic",
    "restore_topic",
    "make_normal",
    "make_sticky",
    "make_announce",
    "make_global",
];

/// Reacts to host lifecycle events and rewrites their payloads where a
/// topic belongs to the designated ideas forum. Holds no state of its
/// own beyond the injected collaborators.
pub struct IdeasListener<I, R, A, K, T, L> {
    auth: A,
    settings: DataBag,
    routes: R,
    ideas: I,
    lang: L,
    links: K,
    template: T,
    user: SessionUser,
    script_ext: String,
}

impl<I, R, A, K, T, L> IdeasListener<I, R, A, K, T, L>
where
    I: IdeaStore,
    R: RouteHelper,
    A: Authorizer,
    K: LinkHelper,
    T: Template,
    L: Language,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        auth: A,
        settings: DataBag,
        routes: R,
        ideas: I,
        lang: L,
        links: K,
        template: T,
        user: SessionUser,
        script_ext: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            settings,
            routes,
            ideas,
            lang,
            links,
            template,
            user,
            script_ext: script_ext.into(),
        }
    }

    fn ideas_forum_id(&self) -> i64 {
        // 0 never matches a real forum, so a missing setting disables
        // every idea-specific branch.
        self.settings.int("ideas_forum_id").unwrap_or(0)
    }

    pub fn dispatch(&self, event: &mut HostEvent) -> ServiceResult<Flow> {
        match event {
            HostEvent::TopicListing(listing) => return Ok(self.ideas_forum_redirect(listing)),
            HostEvent::PostRowRender(row) => self.show_post_buttons(row),
            HostEvent::TopicView(view) => self.show_idea(view)?,
            HostEvent::QuickmodDisplay(quickmod) => self.adjust_quickmod_tools(quickmod),
            HostEvent::OnlineLocation(online) => self.viewonline_ideas(online),
            HostEvent::PostSubmitted(post) => self.edit_idea_title(post)?,
        }
        Ok(Flow::Continue)
    }

    /// Diverts the plain forum listing of the ideas forum to the ideas
    /// index controller.
    pub fn ideas_forum_redirect(&self, event: &TopicListing) -> Flow {
        if event.forum_id != self.ideas_forum_id() {
            return Flow::Continue;
        }
        let url = self.routes.route(IDEAS_INDEX_ROUTE, &[]);
        debug!(forum_id = event.forum_id, %url, "ideas forum listing diverted");
        Flow::Redirect(url)
    }

    /// Hides delete and warn on the first post of an idea topic. The
    /// first post carries the idea itself.
    pub fn show_post_buttons(&self, event: &mut PostRowRender) {
        if event.forum_id != self.ideas_forum_id() {
            return;
        }
        if event.post_id == event.topic_first_post_id {
            event.buttons.delete = false;
            event.buttons.warn = false;
        }
    }

    /// Attaches idea details to the topic view when the topic backs an
    /// idea. The page title passes through untouched.
    pub fn show_idea(&self, event: &TopicView) -> ServiceResult<()> {
        if event.forum_id != self.ideas_forum_id() {
            return Ok(());
        }
        let Some(idea) = self.ideas.idea_by_topic_id(event.topic_id)? else {
            return Ok(());
        };

        let status_label = self.lang.lang(idea.status.lang_key());
        let idea_url = self.links.idea_link(idea.id);
        let is_moderator = self.auth.moderates(self.user.id, event.forum_id);
        let panel = render_idea_panel(&idea, &status_label, &idea_url, is_moderator);
        let score = idea.score();

        self.template.assign_vars(json!({
            "IDEA_ID": idea.id,
            "IDEA_TITLE": idea.title,
            "IDEA_STATUS": status_label,
            "IDEA_VOTES_UP": idea.votes_up,
            "IDEA_VOTES_DOWN": idea.votes_down,
            "IDEA_SCORE": score,
            "U_IDEA": idea_url,
            "S_IDEA_MODERATOR": is_moderator,
        }));
        self.template.assign_var("IDEA_PANEL", Value::String(panel));
        Ok(())
    }

    /// Withdraws the quick-mod tools that would delete or re-categorize
    /// topics inside the ideas forum.
    pub fn adjust_quickmod_tools(&self, event: &mut QuickmodDisplay) {
        if event.forum_id != self.ideas_forum_id() {
            return;
        }
        for tool in SUPPRESSED_QUICKMOD_TOOLS {
            event.tools.suppress(tool);
        }
    }

    /// Rewrites the "who's online" location for sessions browsing the
    /// ideas pages or an idea topic.
    pub fn viewonline_ideas(&self, event: &mut OnlineLocation) {
        let location = match event.on_page.1.as_str() {
            "app" => {
                let prefix = format!("app.{}/", self.script_ext);
                match event.session_page.strip_prefix(prefix.as_str()) {
                    Some("ideas") => Some(self.lang.lang("VIEWING_IDEAS")),
                    Some("ideas/post") => Some(self.lang.lang("POSTING_NEW_IDEA")),
                    _ => None,
                }
            }
            "viewtopic" if event.session_forum_id == self.ideas_forum_id() => {
                Some(self.lang.lang("VIEWING_IDEAS"))
            }
            _ => None,
        };

        if let Some(location) = location {
            event.location = location;
            event.location_url = self.routes.route(IDEAS_INDEX_ROUTE, &[]);
        }
    }

    /// Keeps an idea's stored title in sync when the first post of its
    /// topic is edited with a subject change.
    pub fn edit_idea_title(&self, event: &PostSubmitted) -> ServiceResult<()> {
        if event.mode != PostingMode::Edit
            || !event.update_subject
            || event.forum_id != self.ideas_forum_id()
            || event.post_id != event.data.topic_first_post_id
        {
            return Ok(());
        }
        if let Some(idea) = self.ideas.idea_by_topic_id(event.topic_id)? {
            self.ideas.set_title(idea.id, &event.data.post_subject)?;
            debug!(
                idea_id = idea.id,
                title = %event.data.post_subject,
                "idea title synced from first-post edit"
            );
        }
        Ok(())
    }
}
