//! Counter Example - reactive state driving a live tree
//!
//! Press `+` to increment, `-` to decrement, `q` or Esc to quit. Every
//! key press writes to the reactive state; the render effect re-renders
//! and patches the document, which is then printed.
//!
//! Run with: RUST_LOG=spark_view=debug cargo run --example counter

use std::cell::RefCell;
use std::io::{self, stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{poll, read, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use tracing_subscriber::EnvFilter;

use spark_view::{
    attrs, create_app, create_reactive, h, present, Component, Document, Reactive, Scalar, VNode,
};

struct Counter;

impl Component for Counter {
    type Context = Reactive;

    fn setup(&self) -> Reactive {
        create_reactive([("count", Scalar::from(1)), ("str", Scalar::from("Hello, World"))])
    }

    fn render(&self, state: &Reactive) -> VNode {
        let count = state.get("count").unwrap_or_default();
        h(
            "div",
            attrs! { "id" => "div-wrapper" },
            vec![
                h("h1", attrs! { "id" => "div-test" }, count),
                h("span", attrs! { "class" => "span-str" }, state.get("str").unwrap_or_default()),
                h("p", attrs! {}, "+ / - to change, q to quit"),
            ],
        )
    }
}

fn redraw(doc: &Document) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    present(doc, doc.root(), &mut out)?;
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let doc = Rc::new(RefCell::new(Document::new()));
    let root = doc.borrow().root();
    let app = create_app(Counter).mount(Rc::clone(&doc), root)?;

    enable_raw_mode()?;
    let result = (|| -> io::Result<()> {
        redraw(&doc.borrow())?;
        loop {
            if !poll(Duration::from_millis(250))? {
                continue;
            }
            let Event::Key(key) = read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let step = match key.code {
                KeyCode::Char('+') => 1.0,
                KeyCode::Char('-') => -1.0,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                _ => continue,
            };
            app.context().update("count", |count| {
                let current = count.and_then(|c| c.as_number()).unwrap_or_default();
                Scalar::from(current + step)
            });
            redraw(&doc.borrow())?;
        }
    })();
    disable_raw_mode()?;
    result?;

    println!("final count: {}", app.context().peek("count").unwrap_or_default());
    app.unmount();
    Ok(())
}
