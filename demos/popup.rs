//! Popup demo: a base form with a status label and two buttons; "Open"
//! raises an overlay that captures all input until closed, then focus
//! returns to where it was. `q` quits from anywhere.

use std::cell::Cell;
use std::rc::Rc;

use weft::input::Key;
use weft::pipeline::{run, Config};
use weft::style::GREEN;
use weft::view::builder::{self, Popup};
use weft::view::widgets::{Button, Checkbox, Label};
use weft::view::ViewTree;
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
            b.frame(Some("Popup demo"), |b| {
                b.vertical(|b| {
                    let status = b.widget(Label::colored("-", GREEN));
                    b.rule(None);
                    let open = b.widget(Button::new("Open"));
                    let quit = b.widget(Button::new("Exit"));
                    ids = Some((status, open, quit));
                });
            });
        });
    });
    let (status, open, quit) = ids.expect("builder closure ran");

    let open_requested = Rc::new(Cell::new(false));
    let flag = open_requested.clone();
    tree.widget_mut::<Button>(open)
        .expect("open button")
        .on_click(move || flag.set(true));

    let exit_requested = Rc::new(Cell::new(false));
    let flag = exit_requested.clone();
    tree.widget_mut::<Button>(quit)
        .expect("exit button")
        .on_click(move || flag.set(true));
    let flag = exit_requested.clone();
    let root = tree.root();
    tree.on_key(root, move |ev| {
        if ev.key == Key::Char('q') && !ev.ctrl && !ev.alt {
            flag.set(true);
            true
        } else {
            false
        }
    });

    let mut popup: Option<(Popup, PopupState)> = None;
    run(&mut tree, Config::default(), move |tree, exit| {
        if exit_requested.take() {
            exit.exit();
        }
        if open_requested.take() && popup.is_none() {
            popup = Some(open_popup(tree));
        }
        let close_now = popup.as_ref().is_some_and(|(_, s)| s.closed.get());
        if close_now {
            let (p, state) = popup.take().expect("popup is open");
            p.close(tree);
            let picked = state
                .picks
                .iter()
                .filter(|(_, on)| on.get())
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Some(label) = tree.widget_mut::<Label>(status) {
                label.set_text(if picked.is_empty() { "-".into() } else { picked });
            }
        }
    })?;
    Ok(())
}

struct PopupState {
    closed: Rc<Cell<bool>>,
    picks: Vec<(String, Rc<Cell<bool>>)>,
}

fn open_popup(tree: &mut ViewTree) -> (Popup, PopupState) {
    let closed = Rc::new(Cell::new(false));
    let mut picks = Vec::new();
    let done = closed.clone();
    let popup = Popup::open(tree, |b| {
        b.center(|b| {
            b.frame(Some("Popup"), |b| {
                b.vertical(|b| {
                    for name in ["alpha", "beta", "gamma", "delta", "epsilon"] {
                        let on = Rc::new(Cell::new(false));
                        let id = b.widget(Checkbox::new(name));
                        let state = on.clone();
                        b.tree()
                            .widget_mut::<Checkbox>(id)
                            .expect("checkbox")
                            .on_change(move |v| state.set(v));
                        picks.push((name.to_string(), on));
                    }
                    let ok = b.widget(Button::new("Ok"));
                    b.tree()
                        .widget_mut::<Button>(ok)
                        .expect("ok button")
                        .on_click(move || done.set(true));
                });
            });
        });
    });
    (popup, PopupState { closed, picks })
}
