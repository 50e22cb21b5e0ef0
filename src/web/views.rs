use chrono::Utc;
use chrono_tz::Tz;
use leptos::prelude::*;

use crate::board::dispatch::ClickTarget;
use crate::board::markup::escape_html;
use crate::board::render::{render_list, render_options};
use crate::board::{BoardSnapshot, SignupForm};

const STYLE: &str = include_str!("../style.css");

fn now_label(tz: Tz) -> String {
    Utc::now().with_timezone(&tz).format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// The board is shared by every visitor; `form` is only this response's
/// signup form.
pub(super) fn render_page(
    title: &str,
    tz: Tz,
    snapshot: &BoardSnapshot,
    form: &SignupForm,
) -> String {
    let title = title.to_string();
    let heading = title.clone();
    let now = now_label(tz);
    let list_html = render_list(&snapshot.view.list);
    let options_html = render_options(&snapshot.view.options, &form.activity);
    let email = form.email.clone();

    let note = &snapshot.notification;
    let message_class = if note.visible {
        note.kind.css_class().to_string()
    } else {
        format!("{} hidden", note.kind.css_class())
    };
    let message_html = escape_html(&note.text);

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{title}</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <header>
                    <h1>{heading}</h1>
                    <h2>"Extracurricular Activities"</h2>
                </header>
                <main>
                    <section id="activities-container">
                        <h3>"Available Activities"</h3>
                        <div id="activities-list" inner_html=list_html />
                    </section>
                    <section id="signup-container">
                        <h3>"Sign Up for an Activity"</h3>
                        <form id="signup-form" method="post" action="/signup">
                            <div class="form-group">
                                <label>
                                    "Student Email:"
                                    <input
                                        type="email"
                                        id="email"
                                        name="email"
                                        required
                                        placeholder="your-email@mergington.edu"
                                        value=email
                                    />
                                </label>
                            </div>
                            <div class="form-group">
                                <label>
                                    "Select Activity:"
                                    <select id="activity" name="activity" required inner_html=options_html />
                                </label>
                            </div>
                            <button type="submit">"Sign Up"</button>
                        </form>
                        <div id="message" class=message_class inner_html=message_html />
                    </section>
                </main>
                <footer>
                    <p class="timestamp">"Updated: " {now}</p>
                </footer>
            </body>
        </html>
    }
    .to_html()
}

/// Stand-in for the browser's confirm dialog: the same click is re-posted
/// with the user's answer.
pub(super) fn render_confirm_page(title: &str, prompt: &str, target: &ClickTarget) -> String {
    let title = title.to_string();
    let prompt_html = escape_html(prompt);
    let yes_form = answer_form(target, "yes", "OK");
    let no_form = answer_form(target, "no", "Cancel");
    let actions_html = format!("{yes_form}{no_form}");

    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <title>{title}</title>
                <style>{STYLE}</style>
            </head>
            <body>
                <section id="confirm-container">
                    <p class="prompt" inner_html=prompt_html />
                    <div class="confirm-actions" inner_html=actions_html />
                </section>
            </body>
        </html>
    }
    .to_html()
}

fn answer_form(target: &ClickTarget, answer: &str, label: &str) -> String {
    let mut fields = String::new();
    for class in &target.classes {
        fields.push_str(&format!(
            r#"<input type="hidden" name="marker" value="{}">"#,
            escape_html(class)
        ));
    }
    for (key, value) in &target.data {
        fields.push_str(&format!(
            r#"<input type="hidden" name="data-{}" value="{}">"#,
            escape_html(key),
            escape_html(value)
        ));
    }
    fields.push_str(&format!(r#"<input type="hidden" name="confirmed" value="{answer}">"#));

    let class = format!("confirm-{answer}");
    let label = label.to_string();
    fields.push_str(&view! { <button type="submit" class=class>{label}</button> }.to_html());

    view! { <form method="post" action="/click" inner_html=fields /> }.to_html()
}
