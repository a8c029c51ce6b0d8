//! Mark primitives over every payload state and shape.

use confval_value::{Mark, MarkSet, Type, Value};

fn samples() -> Vec<Value> {
    vec![
        Value::number_int(1),
        Value::bool(true),
        Value::string("hello"),
        Value::unknown(Type::string()),
        Value::null(Type::string()),
        Value::null(Type::empty_object()),
        Value::dynamic(),
        Value::list(vec![Value::number_int(1)]).unwrap(),
        Value::list(vec![Value::number_int(1).mark(Mark::Sensitive)]).unwrap(),
        Value::set_empty(Type::bool()),
        Value::map([("a", Value::string("b"))]).unwrap(),
        Value::object([("x", Value::unknown(Type::number()))]).unwrap(),
        Value::tuple(vec![Value::null(Type::bool()), Value::string("t")]),
        Value::number_int(7).mark("other"),
    ]
}

fn tokens() -> Vec<Mark> {
    vec![Mark::Sensitive, Mark::from("custom")]
}

#[test]
fn marked_value_has_the_mark() {
    for v in samples() {
        for t in tokens() {
            assert!(v.mark(t.clone()).has_mark(t.clone()), "mark({v:?}, {t})");
        }
    }
}

#[test]
fn mark_then_unmark_round_trips_raw() {
    for v in samples() {
        for t in tokens() {
            let (raw, removed) = v.mark(t.clone()).unmark();
            assert!(raw.raw_equals(&v), "unmark(mark({v:?}, {t}))");
            assert!(!raw.is_marked());
            assert!(removed.contains(&t));
        }
    }
}

#[test]
fn marking_twice_is_the_same_as_once() {
    for v in samples() {
        for t in tokens() {
            let once = v.mark(t.clone());
            let twice = once.mark(t.clone());
            assert_eq!(once, twice);
            assert!(once.raw_equals(&twice));
            assert_eq!(once.has_mark(t.clone()), twice.has_mark(t.clone()));
        }
    }
}

#[test]
fn marking_never_changes_type_or_state() {
    for v in samples() {
        let m = v.mark(Mark::Sensitive);
        assert_eq!(m.ty(), v.ty());
        assert_eq!(m.is_known(), v.is_known());
        assert_eq!(m.is_null(), v.is_null());
        assert!(m.raw_equals(&v));
    }
}

#[test]
fn input_is_not_mutated() {
    let v = Value::string("secret");
    let _ = v.mark(Mark::Sensitive);
    assert!(!v.has_mark(Mark::Sensitive));

    let marked = v.mark(Mark::Sensitive);
    let _ = marked.unmark();
    assert!(marked.has_mark(Mark::Sensitive));
}

#[test]
fn marking_is_shallow() {
    let e = Value::number_int(1);
    let l = Value::list(vec![e.clone()]).unwrap();
    let marked = l.mark("t");
    assert!(marked.has_mark("t"));
    assert!(!marked.index(0).unwrap().has_mark("t"));
    assert!(!e.has_mark("t"));
}

#[test]
fn element_marks_do_not_mark_the_container() {
    let l = Value::list(vec![Value::number_int(1).mark(Mark::Sensitive)]).unwrap();
    assert!(!l.has_mark(Mark::Sensitive));
    assert!(!l.is_marked());
}

#[test]
fn unmark_leaves_element_marks() {
    let l = Value::list(vec![Value::number_int(1).mark(Mark::Sensitive)])
        .unwrap()
        .mark(Mark::Sensitive);
    let (raw, removed) = l.unmark();
    assert_eq!(removed, MarkSet::new().with(Mark::Sensitive));
    assert!(!raw.has_mark(Mark::Sensitive));
    assert!(raw.index(0).unwrap().has_mark(Mark::Sensitive));
}

#[test]
fn unmark_of_unmarked_value_removes_nothing() {
    let v = Value::null(Type::list(Type::string()));
    let (raw, removed) = v.unmark();
    assert!(removed.is_empty());
    assert_eq!(raw, v);
}

#[test]
fn values_can_be_shared_between_threads() {
    let v = Value::object([("k", Value::string("v").mark(Mark::Sensitive))])
        .unwrap()
        .mark("outer");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let v = v.clone();
            std::thread::spawn(move || {
                let (raw, _) = v.unmark();
                (v.has_mark("outer"), raw.get_attr("k").unwrap().has_mark(Mark::Sensitive))
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().expect("thread panicked"), (true, true));
    }
    assert!(v.has_mark("outer"));
}

#[test]
fn repeated_keys_never_drop_a_marked_entry() {
    let sensitive = Value::string("s").mark(Mark::Sensitive);
    assert!(Value::map([("k", sensitive.clone()), ("k", Value::string("s"))]).is_err());
    assert!(Value::map([("k", Value::string("s")), ("k", sensitive.clone())]).is_err());
    assert!(Value::object([("k", sensitive.clone()), ("k", Value::string("s"))]).is_err());

    let ok = Value::map([("k", sensitive.clone()), ("j", Value::string("s"))]).unwrap();
    assert!(ok.get("k").unwrap().has_mark(Mark::Sensitive));
}

#[test]
fn set_duplicates_keep_nested_marks() {
    let plain = Value::list(vec![Value::number_int(1)]).unwrap();
    let nested = Value::list(vec![Value::number_int(1).mark(Mark::Sensitive)]).unwrap();

    for elems in [
        vec![plain.clone(), nested.clone()],
        vec![nested.clone(), plain.clone()],
    ] {
        let s = Value::set(elems).unwrap();
        assert_eq!(s.length(), Some(1));
        let kept = s.elements().next().unwrap();
        assert!(
            kept.index(0).unwrap().has_mark(Mark::Sensitive),
            "nested mark lost in {s:?}"
        );
    }

    let obj = |v: Value| Value::object([("secret", v)]).unwrap();
    let s = Value::set(vec![
        obj(Value::string("x")).mark("a"),
        obj(Value::string("x").mark(Mark::Sensitive)),
    ])
    .unwrap();
    let kept = s.elements().next().unwrap();
    assert!(kept.has_mark("a"));
    assert!(kept.get_attr("secret").unwrap().has_mark(Mark::Sensitive));
}
