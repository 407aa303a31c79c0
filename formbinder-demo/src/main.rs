//! Signup form demo.
//!
//! Binds two fields to an in-memory form, replays a few widget events and
//! prints what each widget would render with. Logs go to
//! `formbinder-demo.log`.

mod engine;

use std::fs::File;
use std::sync::Arc;

use formbinder::prelude::*;
use log::info;
use serde_json::json;
use simplelog::{Config, LevelFilter, WriteLogger};

fn print_field(label: &str, form: &MemoryForm, binder: &Binder<MemoryForm>) {
    let props = binder.render_widget();
    let errors = binder
        .name()
        .map(|name| form.get_error(&name))
        .unwrap_or_default();

    println!(
        "  {label:<8} value={} class={:?}",
        props.value.clone().unwrap_or_default(),
        props.class_name().unwrap_or("")
    );
    for error in errors {
        println!("           ! {}", error.message);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(log_file) = File::create("formbinder-demo.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    info!("Starting signup demo");
    let form = Arc::new(MemoryForm::new().with_engine(engine::check));

    // Username validates on every keystroke.
    let username = WidgetProps::new()
        .with_id("username-input")
        .with_config(FieldConfig::new().name("account.username"))
        .with_default_value("")
        .with_value("")
        .with_class_name("text-input");
    let mut username = Binder::new(
        Arc::clone(&form),
        FieldConfig::new()
            .required(true)
            .min(3.0)
            .pattern(Pattern::new("^[a-z0-9_]+$")?)
            .message("3+ characters: lowercase letters, digits, underscore"),
        [username],
    )?;

    // Email validates when the input loses focus.
    let email = WidgetProps::new()
        .with_id("email-input")
        .with_config(FieldConfig::new().name("account.email").field_type(FieldType::Email))
        .with_class_name("text-input");
    let mut email = Binder::new(
        Arc::clone(&form),
        FieldConfig::new()
            .required(true)
            .message("A valid email is required")
            .trigger(Trigger::Blur),
        [email],
    )?;

    username.mount()?;
    email.mount()?;

    println!("Typing \"Al\" into username:");
    username
        .render_widget()
        .fire(&Trigger::Change, &[json!("Al")]);
    print_field("username", &form, &username);

    println!("Typing \"al_92\" into username:");
    username
        .render_widget()
        .fire(&Trigger::Change, &[json!("al_92")]);
    print_field("username", &form, &username);

    println!("Typing \"al@\" into email (no validation until blur):");
    let email_props = email.render_widget();
    email_props.fire(&Trigger::Change, &[json!("al@")]);
    print_field("email", &form, &email);

    println!("Leaving the email field:");
    email_props.fire(&Trigger::Blur, &[]);
    print_field("email", &form, &email);

    println!("Submitting:");
    let valid = form.validate_all();
    println!("  valid={valid} first_invalid={:?}", form.first_invalid().map(|h| h.to_string()));
    println!("  data={}", form.data());

    username.unmount()?;
    email.unmount()?;
    println!("Registered after unmount: {:?}", form.registered_names());
    info!("Signup demo finished (valid={valid})");

    Ok(())
}
