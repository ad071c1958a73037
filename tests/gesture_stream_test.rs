//! Transcripciones de `libinput debug-events` de punta a punta: fichero de
//! configuración en disco → demux → acciones registradas.

use std::fs;

use gestos::action::{ActionError, ActionSink};
use gestos::command_table::CommandTable;
use gestos::demux::{DemuxError, EventDemux};
use gestos::dispatch::DispatchTrace;
use gestos::types::Motion;

#[derive(Default)]
struct Recorder {
    executed: Vec<Vec<String>>,
    traces: Vec<String>,
    fail_on: Option<&'static str>,
}

impl ActionSink for Recorder {
    fn execute(&mut self, argv: &[String]) -> Result<(), ActionError> {
        self.executed.push(argv.to_vec());
        if self.fail_on == Some(argv[0].as_str()) {
            return Err(ActionError::Failed {
                program: argv[0].clone(),
                status: "exit status: 1".to_string(),
            });
        }
        Ok(())
    }

    fn trace(&mut self, trace: &DispatchTrace<'_>) {
        self.traces.push(trace.to_string());
    }
}

const CONFIG: &str = "\
# Navegador: adelante / atrás
3 left  xdotool key alt+Right
3 right xdotool key alt+Left
4 up    xdotool key super
# Zoom
2 in  xdotool key ctrl+minus
2 out xdotool key ctrl+plus
2 clockwise xdotool key ctrl+r
";

fn load_table() -> CommandTable {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gestos.conf");
    fs::write(&path, CONFIG).unwrap();
    CommandTable::load(&path).unwrap()
}

fn run(table: &CommandTable, sink: Recorder, dry_run: bool, transcript: &str) -> (Vec<Option<Motion>>, Recorder) {
    let mut demux = EventDemux::new(table, sink, dry_run);
    let fired = transcript
        .lines()
        .filter_map(|line| match demux.feed_line(line) {
            Ok(Some(m)) => Some(Some(m)),
            Ok(None) => None,
            Err(DemuxError::Action { .. }) => Some(None),
            Err(DemuxError::Anomaly(_)) => None,
        })
        .collect();
    (fired, demux.into_sink())
}

#[test]
fn config_round_trip_from_disk() {
    let table = load_table();
    let expected: Vec<String> = ["xdotool", "key", "alt+Right"].map(String::from).to_vec();
    assert_eq!(table.get(3, Motion::Left), Some(expected.as_slice()));
    assert_eq!(table.get(3, Motion::Down), None);
    assert_eq!(table.len(), 6);
}

#[test]
fn three_finger_swipe_left_runs_once() {
    let table = load_table();
    let transcript = "\
-event6   DEVICE_ADDED     SynPS/2 Synaptics TouchPad        seat0 default group8  cap:pg
 event6   GESTURE_SWIPE_BEGIN  +3.012s\t3
 event6   GESTURE_SWIPE_UPDATE +3.020s\t3 -12.50/ 1.00 (-25.00/ 2.00 unaccelerated)
 event6   GESTURE_SWIPE_UPDATE +3.028s\t3 -30.00/ 0.50 (-60.00/ 1.00 unaccelerated)
 event6   GESTURE_SWIPE_UPDATE +3.036s\t3 -40.00/-0.50 (-80.00/-1.00 unaccelerated)
 event6   GESTURE_SWIPE_UPDATE +3.044s\t3 -40.00/ 0.00 (-80.00/ 0.00 unaccelerated)
 event6   GESTURE_SWIPE_END    +3.050s\t3
";
    let (fired, sink) = run(&table, Recorder::default(), false, transcript);
    assert_eq!(fired, vec![Some(Motion::Left)]);
    assert_eq!(sink.executed, vec![vec!["xdotool", "key", "alt+Right"]]);
}

#[test]
fn consecutive_gestures_each_get_one_action() {
    let table = load_table();
    let transcript = "\
 event6 GESTURE_SWIPE_BEGIN +1.0s 3
 event6 GESTURE_SWIPE_UPDATE +1.1s 3 90.0/0.0
 event6 GESTURE_SWIPE_UPDATE +1.2s 3 90.0/0.0
 event6 GESTURE_SWIPE_END +1.3s 3
 event6 GESTURE_SWIPE_BEGIN +2.0s 4
 event6 GESTURE_SWIPE_UPDATE +2.1s 4 0.0/-45.0
 event6 GESTURE_SWIPE_UPDATE +2.2s 4 0.0/-45.0
 event6 GESTURE_SWIPE_END +2.3s 4 cancelled
";
    let (fired, sink) = run(&table, Recorder::default(), false, transcript);
    assert_eq!(fired, vec![Some(Motion::Right), Some(Motion::Up)]);
    assert_eq!(
        sink.executed,
        vec![
            vec!["xdotool", "key", "alt+Left"],
            vec!["xdotool", "key", "super"],
        ]
    );
}

#[test]
fn pinch_rotation_beats_simultaneous_zoom() {
    let table = load_table();
    let transcript = "\
 event6 GESTURE_PINCH_BEGIN +1.0s 2
 event6 GESTURE_PINCH_UPDATE +1.1s 2  0.00/ 0.00 ( 0.00/ 0.00 unaccelerated)  1.00 @ 10.00
 event6 GESTURE_PINCH_UPDATE +1.2s 2  0.00/ 0.00 ( 0.00/ 0.00 unaccelerated)  1.80 @ 35.00
 event6 GESTURE_PINCH_END +1.3s 2
";
    let (fired, sink) = run(&table, Recorder::default(), false, transcript);
    assert_eq!(fired, vec![Some(Motion::Clockwise)]);
    assert_eq!(sink.executed, vec![vec!["xdotool", "key", "ctrl+r"]]);
}

#[test]
fn unbound_four_finger_right_keeps_trying_until_up() {
    let table = load_table();
    // "4 right" no tiene comando; el mismo gesto acaba en "4 up"
    let transcript = "\
 event6 GESTURE_SWIPE_BEGIN +1.0s 4
 event6 GESTURE_SWIPE_UPDATE +1.1s 4 80.0/0.0
 event6 GESTURE_SWIPE_UPDATE +1.2s 4 -80.0/-200.0
 event6 GESTURE_SWIPE_UPDATE +1.3s 4 0.0/-200.0
 event6 GESTURE_SWIPE_END +1.4s 4
";
    let (fired, sink) = run(&table, Recorder::default(), false, transcript);
    assert_eq!(fired, vec![Some(Motion::Up)]);
    assert_eq!(sink.executed.len(), 1);
}

#[test]
fn failed_action_does_not_stop_the_stream() {
    let table = load_table();
    let sink = Recorder {
        fail_on: Some("xdotool"),
        ..Default::default()
    };
    let transcript = "\
 event6 GESTURE_SWIPE_BEGIN +1.0s 3
 event6 GESTURE_SWIPE_UPDATE +1.1s 3 -90.0/0.0
 event6 GESTURE_SWIPE_UPDATE +1.2s 3 -90.0/0.0
 event6 GESTURE_SWIPE_END +1.3s 3
 event6 GESTURE_PINCH_BEGIN +2.0s 2
 event6 GESTURE_PINCH_UPDATE +2.1s 2 0.0/0.0 1.0 @ 0.0
 event6 GESTURE_PINCH_UPDATE +2.2s 2 0.0/0.0 2.0 @ 0.0
 event6 GESTURE_PINCH_END +2.3s 2
";
    let (fired, sink) = run(&table, sink, false, transcript);
    // Ambos gestos fallan al ejecutar pero cada uno sólo lo intenta una vez
    assert_eq!(fired, vec![None, None]);
    assert_eq!(sink.executed.len(), 2);
}

#[test]
fn dry_run_traces_every_check_and_executes_nothing() {
    let table = load_table();
    let transcript = "\
 event6 GESTURE_PINCH_BEGIN +1.0s 2
 event6 GESTURE_PINCH_UPDATE +1.1s 2 0.0/0.0 1.0 @ 0.0
 event6 GESTURE_PINCH_UPDATE +1.2s 2 -80.0/0.0 0.5 @ 0.0
 event6 GESTURE_PINCH_UPDATE +1.3s 2 -10.0/0.0 0.4 @ 0.0
 event6 GESTURE_PINCH_END +1.4s 2
";
    let (fired, sink) = run(&table, Recorder::default(), true, transcript);
    assert_eq!(fired, vec![Some(Motion::In)]);
    assert!(sink.executed.is_empty());
    // Escala "in" y desplazamiento "left" en la misma muestra; después ya no
    // hay más comprobaciones porque la sesión quedó resuelta
    assert_eq!(sink.traces.len(), 2);
    assert!(sink.traces[0].starts_with("pinch in 2"));
    assert!(sink.traces[1].starts_with("pinch left 2"));
}
