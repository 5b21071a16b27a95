//! End-to-end tests for the multi-field form, through the simulator and
//! through a full `Program` with a recording presenter.

use inputlab::prelude::*;
use inputlab::{FormSnapshot, LOOKS_GOOD, SUBMIT_HINT};
use inputlab_runtime::CmdRecord;

fn fill(name: &str, age: &str, email: &str) -> Vec<Event> {
    vec![
        Event::EditField(FieldId::Name, name.into()),
        Event::EditField(FieldId::Age, age.into()),
        Event::EditField(FieldId::Email, email.into()),
    ]
}

#[test]
fn valid_submission_is_emitted_and_form_resets() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_events(&fill("Al", "25", "al@x.com"));
    assert!(!sim.snapshot().form.submit_disabled);

    sim.inject_event(Event::Submit);
    assert_eq!(
        sim.drain_outputs(),
        vec![Submission {
            name: "Al".into(),
            age: 25,
            email: "al@x.com".into(),
        }]
    );
    assert_eq!(sim.command_log().last(), Some(&CmdRecord::Emit));

    let form = sim.snapshot().form;
    for field in FieldId::ALL {
        let f = form.field(field);
        assert_eq!(f.value, "");
        assert!(!f.touched);
        assert_eq!(f.hint, LOOKS_GOOD);
    }
}

#[test]
fn invalid_submission_touches_all_and_emits_nothing() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_events(&fill("", "12", "a@b"));
    sim.inject_event(Event::Submit);

    assert!(sim.outputs().is_empty());
    let form = sim.snapshot().form;
    assert_eq!(
        form.field(FieldId::Name).visible_error.as_deref(),
        Some("Name is required")
    );
    assert_eq!(
        form.field(FieldId::Age).visible_error.as_deref(),
        Some("Age must be between 13–120")
    );
    assert_eq!(
        form.field(FieldId::Email).visible_error.as_deref(),
        Some("Enter a valid email address")
    );
    assert_eq!(form.submit_hint, Some(SUBMIT_HINT));
    assert_eq!(form.field(FieldId::Age).value, "12");
}

#[test]
fn blur_without_edit_reveals_required() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_event(Event::BlurField(FieldId::Email));
    let form = sim.snapshot().form;
    assert_eq!(
        form.field(FieldId::Email).visible_error.as_deref(),
        Some("Email is required")
    );
    assert_eq!(form.field(FieldId::Name).visible_error, None);
}

#[test]
fn age_messages_follow_rule_order() {
    let mut sim = ProgramSimulator::new(LiveDemo::default());
    sim.init();
    sim.inject_event(Event::BlurField(FieldId::Age));

    let cases = [
        ("", Some("Age is required")),
        ("abc", Some("Age must be a number")),
        ("18.5", Some("Age must be a whole number")),
        ("121", Some("Age must be between 13–120")),
        ("13", None),
        ("120", None),
    ];
    for (raw, expected) in cases {
        sim.inject_event(Event::EditField(FieldId::Age, raw.into()));
        assert_eq!(
            sim.snapshot().form.field(FieldId::Age).visible_error.as_deref(),
            expected,
            "age input {raw:?}"
        );
    }
}

#[derive(Default)]
struct Recorder {
    frames: Vec<FormSnapshot>,
    delivered: Vec<String>,
}

impl Presenter<DemoSnapshot, Submission> for Recorder {
    fn render(&mut self, snapshot: &DemoSnapshot) {
        self.frames.push(snapshot.form.clone());
    }

    fn deliver(&mut self, output: Submission) {
        self.delivered.push(output.to_string());
    }
}

#[test]
fn program_delivers_alert_text_to_presenter() {
    let store = FieldStore::in_memory().shared();
    let mut program = Program::new(LiveDemo::default(), Recorder::default())
        .with_persistence(PersistenceConfig::with_store(store));
    program.init();
    for event in fill("Ada", "36", "ada@example.org") {
        program.dispatch(event);
    }
    program.dispatch(Event::Submit);

    let recorder = program.presenter();
    assert_eq!(
        recorder.delivered,
        ["Submitted!\nName: Ada\nAge: 36\nEmail: ada@example.org".to_string()]
    );
    // One frame for init plus one per dispatched event.
    assert_eq!(recorder.frames.len(), 5);
    let last = recorder.frames.last().expect("frames rendered");
    assert!(last.submit_disabled);
    assert_eq!(last.field(FieldId::Name).value, "");
}
