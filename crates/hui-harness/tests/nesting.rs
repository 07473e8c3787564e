#![forbid(unsafe_code)]

//! Integration tests: nested widgets resolve their own context.

use std::rc::Rc;

use hui_core::event::Key;
use hui_core::markup::Node;
use hui_harness::Harness;
use hui_widgets::alert_dialog::ALERT_DIALOG;
use hui_widgets::dialog::{DIALOG, dialog_context};
use hui_widgets::{
    AlertDialog, AlertDialogCancel, AlertDialogContent, AlertDialogDescription, AlertDialogTitle,
    AlertDialogTrigger, Collapsible, CollapsibleContent, CollapsibleTrigger, Dialog, DialogClose,
    DialogContent, DialogTitle, DialogTrigger, render_fn,
};

fn open_state(label: &'static str) -> impl hui_widgets::Component {
    render_fn(move |cx| {
        let node = dialog_context().lookup(cx, DIALOG, Some("OpenState"))?;
        Ok(Node::text(format!("{label}:{}", node.open)))
    })
}

#[test]
fn lookup_between_and_inside_nested_dialogs() {
    let outer = Dialog::new()
        .default_open(false)
        .child(open_state("between"))
        .child(Dialog::new().default_open(true).child(open_state("inside")));
    let h = Harness::mount(outer).unwrap();
    assert_eq!(h.html(), "between:falseinside:true");
}

#[test]
fn orphaned_part_fails_with_part_and_group() {
    let err = Harness::mount(DialogTrigger::new().child("Open")).unwrap_err();
    assert_eq!(err.to_string(), "Trigger must be used within Dialog");
}

#[test]
fn escape_closes_innermost_dialog_first() {
    let inner = Rc::new(
        Dialog::new()
            .child(DialogTrigger::new().child("Inner"))
            .child(
                DialogContent::new()
                    .child(DialogTitle::new().child("Inner dialog"))
                    .child(DialogClose::new().child("Close inner")),
            ),
    );
    let outer = Rc::new(
        Dialog::new().child(DialogTrigger::new().child("Outer")).child(
            DialogContent::new()
                .child(DialogTitle::new().child("Outer dialog"))
                .child_shared(inner.clone()),
        ),
    );
    let mut h = Harness::mount_shared(outer.clone()).unwrap();

    h.click_text("Outer").unwrap();
    assert_eq!(h.focused_text(), Some("Inner"));
    h.click_text("Inner").unwrap();
    assert_eq!(h.focused_text(), Some("Close inner"));
    assert_eq!(h.all_by_role("dialog").len(), 2);

    h.press(Key::Escape).unwrap();
    assert!(!inner.is_open());
    assert!(outer.is_open());
    assert_eq!(h.focused_text(), Some("Inner"));

    h.press(Key::Escape).unwrap();
    assert!(!outer.is_open());
    assert_eq!(h.focused_text(), Some("Outer"));
}

#[test]
fn alert_dialog_inside_dialog_binds_its_own_cancel() {
    let alert = Rc::new(
        AlertDialog::new()
            .child(AlertDialogTrigger::new().child("Delete"))
            .child(
                AlertDialogContent::new()
                    .child(AlertDialogTitle::new().child("Sure?"))
                    .child(AlertDialogDescription::new().child("Gone for good."))
                    .child(AlertDialogCancel::new().child("Cancel")),
            ),
    );
    let dialog = Rc::new(
        Dialog::new().default_open(true).child(
            DialogContent::new()
                .child(DialogTitle::new().child("Files"))
                .child_shared(alert.clone())
                .child(DialogClose::new().child("Done")),
        ),
    );
    let mut h = Harness::mount_shared(dialog.clone()).unwrap();

    h.click_text("Delete").unwrap();
    assert!(h.by_role("alertdialog").is_some());
    assert_eq!(h.focused_text(), Some("Cancel"));

    h.click_text("Cancel").unwrap();
    assert!(!alert.is_open());
    assert!(dialog.is_open());
    assert_eq!(h.focused_text(), Some("Delete"));
}

#[test]
fn alert_parts_skip_enclosing_dialog_group() {
    let alert = AlertDialog::new().default_open(true).child(render_fn(|cx| {
        let alert = dialog_context().lookup(cx, ALERT_DIALOG, None)?;
        let dialog = dialog_context().lookup(cx, DIALOG, None)?;
        Ok(Node::text(format!("{}/{}", alert.open, dialog.open)))
    }));
    let dialog = Dialog::new().child(alert);
    let h = Harness::mount(dialog).unwrap();
    assert_eq!(h.html(), "true/false");
}

#[test]
fn collapsible_inside_dialog_keeps_separate_state() {
    let section = Rc::new(
        Collapsible::new()
            .child(CollapsibleTrigger::new().child("Advanced"))
            .child(CollapsibleContent::new().child("Knobs")),
    );
    let dialog = Rc::new(
        Dialog::new().default_open(true).child(
            DialogContent::new()
                .child(DialogTitle::new().child("Prefs"))
                .child_shared(section.clone()),
        ),
    );
    let mut h = Harness::mount_shared(dialog.clone()).unwrap();
    h.click_text("Advanced").unwrap();
    assert!(section.is_open());
    assert!(dialog.is_open());
    assert!(h.by_text("Knobs").is_some());
}
