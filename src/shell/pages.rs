//! Static pages rendered from the profile section of the config.

use std::fmt::Write;

use crate::config::ProfileConfig;
use crate::games::Theme;

/// One line per built-in command, in the order `help` lists them.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Lists all available commands."),
    ("about", "Learn more about the developer."),
    ("projects", "View a showcase of developer projects."),
    ("skills", "See the developer's technical skills and expertise."),
    ("contact", "Get contact information and social media links."),
    ("resume", "View or download the developer's resume."),
    ("hireme", "See why you should hire this developer."),
    ("feedback", "Share your thoughts about this portfolio."),
    ("snake", "Play a game of Snake! Steer with arrow keys, wasd or hjkl."),
    ("echo", "Repeats back whatever you type after the command. Usage: echo <text>"),
    ("uptime", "See how long the terminal has been running."),
    ("history", "Show the commands entered so far."),
    ("clear", "Clears the terminal screen."),
    ("exit", "Leave the terminal."),
];

pub fn help(themes: &[Theme]) -> String {
    let mut out = String::from("Available commands:\n");
    for (cmd, desc) in COMMANDS {
        let _ = writeln!(out, "  {:<10} {}", cmd, desc);
    }
    for theme in themes {
        let info = theme.info();
        let _ = writeln!(
            out,
            "  {:<10} Play the {}. Try '{} start'.",
            info.keyword, info.title, info.keyword
        );
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn about(profile: &ProfileConfig) -> String {
    if profile.name.is_empty() {
        return profile.about.clone();
    }
    format!("{}\n{}", profile.name, profile.about)
}

pub fn projects(profile: &ProfileConfig) -> String {
    if profile.projects.is_empty() {
        return "No projects listed yet.".to_string();
    }
    let mut out = String::new();
    for p in &profile.projects {
        let _ = writeln!(out, "* {}", p.name);
        let _ = writeln!(out, "  {}", p.description);
        match &p.github {
            Some(url) => {
                let _ = writeln!(out, "  GitHub: {}", url);
            }
            None => {
                let _ = writeln!(out, "  GitHub: private repository");
            }
        }
        if let Some(url) = &p.demo {
            let _ = writeln!(out, "  Demo: {}", url);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn skills(profile: &ProfileConfig) -> String {
    let mut out = String::new();
    for group in &profile.skills {
        let _ = writeln!(out, "{}:", capitalize(&group.category));
        for item in &group.items {
            let _ = writeln!(out, "  - {}", item);
        }
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn contact(profile: &ProfileConfig) -> String {
    profile
        .contact
        .iter()
        .map(|c| format!("{}: {}", c.label, c.value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn resume(profile: &ProfileConfig) -> String {
    match &profile.resume_url {
        Some(url) => format!("Download my resume: {}", url),
        None => "No resume link has been published yet.".to_string(),
    }
}

pub fn hireme(profile: &ProfileConfig) -> String {
    let mut out = String::from("Why You Should Hire Me:\n");
    for point in &profile.hire_me {
        let _ = writeln!(out, "  * {}", point);
    }
    if let Some(url) = &profile.resume_url {
        let _ = writeln!(out, "  CV: {}", url);
    }
    out.truncate(out.trim_end().len());
    out
}

pub fn feedback(profile: &ProfileConfig) -> String {
    let mut out = String::from("I'd love to hear your thoughts! You can reach me at:");
    for entry in &profile.feedback {
        let _ = write!(out, "\n  {}: {}", entry.label, entry.value);
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
