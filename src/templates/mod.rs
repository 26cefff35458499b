pub mod idea_template;
