//! Example: Basic usage of Lumen
//!
//! Builds a small tree, ticks it with flexbox layout attached and prints the
//! command stream. Run with `RUST_LOG=debug` to see the pipeline logs.

use lumen_engine::{
    Config, Event, EventDispatcher, EventType, Listener, Session, TaffyLayoutAdapter, Tag,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut session = Session::new(Config::default().with_viewport(Some(320.0), Some(240.0)));
    session.set_layout_adapter(Box::new(TaffyLayoutAdapter::new()))?;
    session.add_css(
        ".row { display: flex; height: 40px; gap: 8px }
         .cell { flex: 1; background-color: red }
         .cell:hover { opacity: 0.5 }",
    )?;

    let root = session.root();
    let row = session.create_element(Tag::Div);
    session.set_attribute(row, "class", "row")?;
    session.append_child(root, row)?;

    let mut cells = Vec::new();
    for label in ["one", "two", "three"] {
        let cell = session.create_element(Tag::Span);
        let text = session.create_text_node(label);
        session.set_attribute(cell, "class", "cell")?;
        session.append_child(cell, text)?;
        session.append_child(row, cell)?;
        cells.push(cell);
    }

    let first = session.tick();
    println!("first tick: {} commands", first.len());
    println!("{}", first.to_json()?);

    let hover = Listener::new(|store, event| {
        if let Some(target) = event.target() {
            store.set_pseudo_state(target, lumen_engine::PseudoState::HOVER, true)?;
        }
        Ok(())
    });
    session.add_event_listener(row, EventType::PointerOver, &hover, false)?;
    session.dispatch_event(cells[1], &mut Event::pointer(EventType::PointerOver, 150.0, 20.0, 0, 1))?;

    let bytes = session.tick_binary()?;
    println!("hover tick: {} bytes on the wire", bytes.len());

    session.teardown();
    Ok(())
}
