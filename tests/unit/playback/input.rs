use super::*;

#[test]
fn default_chord_is_shift_p() {
    let chord = KeyChord::default();
    assert!(chord.matches(KeyPress::shifted('P')));
    assert!(!chord.matches(KeyPress::plain('P')));
    assert!(!chord.matches(KeyPress::shifted('O')));
    assert!(!chord.matches(KeyPress {
        ctrl: true,
        ..KeyPress::shifted('P')
    }));
}

#[test]
fn chord_deserializes_partially() {
    let chord: KeyChord = serde_json::from_value(serde_json::json!({ "key": "K" })).unwrap();
    assert_eq!(chord.key, 'K');
    assert!(chord.shift);
}

#[test]
fn commands_round_trip_through_json() {
    let v = serde_json::to_value(Command::JumpTo(-2)).unwrap();
    assert_eq!(v, serde_json::json!({ "JumpTo": -2 }));
    assert_eq!(serde_json::from_value::<Command>(v).unwrap(), Command::JumpTo(-2));
}
