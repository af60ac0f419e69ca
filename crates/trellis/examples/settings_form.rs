//! A settings form driven by a scripted host.
//!
//! Real hosts render the request and wait for the user; this one replays a
//! canned interaction so the example runs standalone. Run with
//! `RUST_LOG=trellis=debug` to watch the submission cycle.

use serde_json::json;
use trellis::prelude::*;

/// Replays scripted payloads in order, printing each outgoing request.
struct ScriptedHost {
    responses: Vec<ResultPayload>,
}

impl RenderHost for ScriptedHost {
    fn submit(
        &mut self,
        request: &RenderRequest,
        await_response: bool,
    ) -> std::result::Result<Option<ResultPayload>, trellis::HostError> {
        println!(
            "-> host: \"{}\" {} widgets, rows {:?}",
            request.title,
            request.widgets.len(),
            request.rows
        );
        if !await_response {
            return Ok(None);
        }
        if self.responses.is_empty() {
            return Err(trellis::HostError::Transport("script exhausted".into()));
        }
        Ok(Some(self.responses.remove(0)))
    }
}

fn main() -> trellis::Result<()> {
    tracing_subscriber::fmt::init();

    let mut dialog = Dialog::stack_vertical("Settings");
    dialog.set_column_size(0, TrackSize::Stretch);

    let name = shared(TextField::new().with_placeholder("Display name"));
    let volume = shared(NumberField::new().with_value(0.5).with_decimal_places(2));
    let notify = shared(Checkbox::new("Enable notifications"));

    // "Advanced" starts collapsed; its fields stay out of the layout until
    // the user expands it.
    let advanced = shared(CollapseGroup::new("Advanced"));
    let cache_dir = shared(TextField::new().with_text("/var/cache/app"));
    advanced.borrow_mut().link_widget(cache_dir.clone());

    dialog.add_widget(name.clone())?;
    dialog.add_widget(volume.clone())?;
    dialog.add_widget(notify.clone())?;
    dialog.add_widget(advanced.clone())?;
    dialog.add_widget(cache_dir.clone())?;
    advanced.borrow_mut().set_collapsed(true);

    notify.borrow_mut().toggled.connect(|&on| {
        println!("   notifications toggled: {on}");
    });
    name.borrow_mut().changed.connect(|text: &String| {
        println!("   name changed: {text:?}");
    });

    // The scripted user renames themselves, turns notifications on, and
    // expands the advanced section.
    let mut first = ResultPayload::new();
    first.set_value(name.borrow().id(), json!("Ada"));
    first.set_value(notify.borrow().id(), json!(true));
    first.set_value(advanced.borrow().id(), json!(false));

    let mut host = ScriptedHost {
        responses: vec![first],
    };

    dialog.show(&mut host)?;

    println!(
        "final: name={:?} volume={} advanced collapsed={}",
        name.borrow().text(),
        volume.borrow().value(),
        advanced.borrow().is_collapsed()
    );
    // The cache directory field came back into the layout when the group
    // expanded; a second round would now include it.
    dialog.display(&mut host)?;
    Ok(())
}
