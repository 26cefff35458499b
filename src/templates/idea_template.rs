use crate::idea::IdeaRecord;
use std::fmt::Write;

pub fn render_idea_panel(
    idea: &IdeaRecord,
    status_label: &str,
    idea_url: &str,
    is_moderator: bool,
) -> String {
    let mut html = String::new();
    writeln!(
        html,
        "<div id=\"idea_panel\"><a class=\"idea_title\" href=\"{}\">{}</a> <span class=\"idea_status\">{}</span>",
        idea_url, idea.title, status_label
    )
    .ok();
    writeln!(
        html,
        "<div class=\"idea_votes\"><span class=\"votes_up\">{}</span> <span class=\"votes_down\">{}</span> <span class=\"score\">{}</span></div>",
        idea.votes_up,
        idea.votes_down,
        idea.score()
    )
    .ok();

    if is_moderator {
        html.push_str("<div class=\"idea_mod_tools\"><button class=\"change_status\">Change status</button></div>");
    }

    html.push_str("</div>");
    html
}
