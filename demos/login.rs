//! Login form demo: two text fields, a checkbox and a submit button inside
//! a titled frame. Submitting with the password "pass" exits.
//!
//! Run with `RUST_LOG=weft=debug` to see engine logging on stderr.

use std::cell::Cell;
use std::rc::Rc;

use weft::pipeline::{run, Config};
use weft::style::BLUE;
use weft::view::widgets::{Button, Checkbox, Label, Spacer, TextInput};
use weft::view::{builder, ViewTree};
use weft::EngineError;

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut tree = ViewTree::new();
    let mut ids = None;
    builder::build(&mut tree, |b| {
        b.center(|b| {
            b.frame(Some("Login"), |b| {
                b.grid(3, 4, |g| {
                    g.put(Label::colored("Username", BLUE));
                    g.put(Spacer::new(2, 0));
                    let user = g.put(TextInput::new(12));
                    g.put(Label::colored("Password", BLUE));
                    g.skip();
                    let pass = g.put(TextInput::password(12));
                    let remember = g.put_span(Checkbox::new("Remember me"), 3, 1);
                    g.skip();
                    g.skip();
                    let ok = g.put_span(Button::new("Ok"), 3, 1);
                    ids = Some((user, pass, remember, ok));
                });
            });
        });
    });
    let (user, pass, remember, ok) = ids.expect("grid closure ran");

    let submitted = Rc::new(Cell::new(false));
    let flag = submitted.clone();
    tree.widget_mut::<Button>(ok)
        .expect("ok button")
        .on_click(move || flag.set(true));

    let config = Config {
        ctrl_c_exits: false,
        ..Config::default()
    };
    run(&mut tree, config, |tree, exit| {
        if submitted.take() {
            let entered = tree.widget::<TextInput>(pass).expect("password field").value();
            if entered == "pass" {
                exit.exit();
            }
        }
    })?;

    let name = tree.widget::<TextInput>(user).expect("username field").value();
    println!("Bye {name}!");
    if tree.widget::<Checkbox>(remember).expect("checkbox").checked() {
        println!("You will be remembered");
    }
    Ok(())
}
