use pretty_assertions::assert_eq;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use seqtrack::prelude::*;

fn random_sequence(seed: u64, events: usize, triggers: usize) -> Sequence {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut seq = Sequence::new(format!("pattern {seed}"));
    seq.set_number(SeqNumber::new(rng.random_range(0..2048)));
    seq.set_buss(rng.random_range(0..16));
    seq.set_channel(rng.random_range(0..16));
    seq.set_time_signature(TimeSignature::new(3, 8));
    seq.set_key(Some(rng.random_range(0..12)));
    seq.set_scale(Some(rng.random_range(0..8)));
    seq.set_background(SeqNumber::new(rng.random_range(0..2048)));
    seq.set_transpose(rng.random_bool(0.5));

    let mut tick = 0u32;
    for _ in 0..events {
        tick += rng.random_range(0..20_000);
        let event = match rng.random_range(0..6) {
            0 => Event::channel(tick, 0x90 | rng.random_range(0..16u8), rng.random_range(0..128), 100),
            1 => Event::channel(tick, 0x80, rng.random_range(0..128), 0),
            2 => Event::channel(tick, 0xC0 | rng.random_range(0..16u8), rng.random_range(0..128), 0),
            3 => Event::channel(tick, 0xE5, rng.random_range(0..128), rng.random_range(0..128)),
            4 => Event::sysex(tick, [0x7E, 0x7F, 0x09, 0x01, 0xF7]),
            _ => Event::meta(tick, 0x01, *b"marker"),
        };
        seq.add_event(event);
    }
    seq.set_length(tick + rng.random_range(0..500));

    let mut start = 0u32;
    for _ in 0..triggers {
        start += rng.random_range(0..300_000);
        let end = start + rng.random_range(0..3_000_000);
        seq.add_trigger(Trigger::new(start, end, rng.random_range(0..768)));
        start = end + 1;
    }
    seq
}

fn round_trip<C: MidiContainer + Default>(seq: &Sequence, song: &Song, track: u16) -> ParsedTrack {
    let mut container = C::default();
    TrackFill::new(seq).song(song).fill(&mut container, track);
    parse_track(&mut container, track).unwrap()
}

fn assert_same_sequence(decoded: &Sequence, seq: &Sequence) {
    assert_eq!(decoded.events(), seq.events());
    assert_eq!(decoded.triggers(), seq.triggers());
    assert_eq!(decoded.name(), seq.name());
    assert_eq!(decoded.number(), seq.number());
    assert_eq!(decoded.length(), seq.length());
    assert_eq!(decoded.buss(), seq.buss());
    assert_eq!(decoded.channel(), seq.channel());
    assert_eq!(decoded.time_signature(), seq.time_signature());
    assert_eq!(decoded.key(), seq.key());
    assert_eq!(decoded.scale(), seq.scale());
    assert_eq!(decoded.background(), seq.background());
    assert_eq!(decoded.transpose(), seq.transpose());
}

fn busy_song() -> Song {
    Song {
        bpm: Bpm::from_millis(133_250),
        midi_controls: vec![
            MidiControl {
                toggle: ControlBinding {
                    active: true,
                    inverse: false,
                    status: 0x90,
                    data: 36,
                    min: 1,
                    max: 127,
                },
                ..Default::default()
            };
            3
        ],
        clocks: vec![ClockMode::Pos, ClockMode::Off, ClockMode::Mod, ClockMode::Disabled],
        notes: vec!["intro".into(), String::new(), "chorus ♫".into()],
        mute_groups: vec![vec![true, false, true], vec![false; 3]],
    }
}

#[test]
fn sequences_survive_both_containers() {
    for seed in 1..20 {
        let seq = random_sequence(seed, seed as usize * 7, seed as usize % 5);
        let song = Song::default();
        for track in [1, 5, 31] {
            let parsed = round_trip::<MidiVector>(&seq, &song, track);
            assert_same_sequence(&parsed.sequence, &seq);
            assert!(parsed.warnings.is_empty());
            assert!(parsed.song.is_none());

            let parsed = round_trip::<MidiList>(&seq, &song, track);
            assert_same_sequence(&parsed.sequence, &seq);
        }
    }
}

#[test]
fn tempo_track_carries_the_song() {
    let seq = random_sequence(99, 40, 3);
    let song = busy_song();

    let parsed = round_trip::<MidiVector>(&seq, &song, TEMPO_TRACK);
    assert_same_sequence(&parsed.sequence, &seq);
    assert_eq!(parsed.song, Some(song.clone()));
    assert!(parsed.warnings.is_empty());

    let parsed = round_trip::<MidiList>(&seq, &song, TEMPO_TRACK);
    assert_eq!(parsed.song, Some(song));
}

#[test]
fn legacy_format_drops_extensions() {
    let seq = random_sequence(7, 10, 2);
    let mut container = MidiVector::default();
    TrackFill::new(&seq)
        .options(FillOptions::new().legacy_format(true))
        .fill(&mut container, 2);
    let decoded = parse_track(&mut container, 2).unwrap().sequence;

    assert_eq!(decoded.events(), seq.events());
    assert_eq!(decoded.triggers(), seq.triggers());
    assert_eq!(decoded.key(), None);
    assert_eq!(decoded.scale(), None);
    assert_eq!(decoded.background(), SeqNumber::LIMIT);
    assert!(decoded.transpose());
}

#[test]
fn unnumbered_sequence_has_no_number_event() {
    let mut seq = Sequence::new("");
    seq.set_number(SeqNumber::NULL);
    let mut container = MidiVector::default();
    TrackFill::new(&seq).fill(&mut container, 4);
    // the first event is the trigger block, not FF 00 or FF 03
    assert_eq!(&container.as_slice()[..3], [0x00, 0xFF, 0x7F]);

    let decoded = parse_track(&mut container, 4).unwrap().sequence;
    assert!(decoded.number().is_null());
    assert_eq!(decoded.name(), "");
}

#[test]
fn leading_header_like_events_stay_in_the_body() {
    for number in [SeqNumber::NULL, SeqNumber::new(9)] {
        let mut seq = Sequence::new("");
        seq.set_number(number);
        seq.add_event(Event::meta(0, 0x03, *b"cue"));
        seq.add_event(Event::meta(0, 0x00, [0, 7]));
        seq.add_event(Event::meta(0, 0x51, [0x07, 0xA1, 0x20]));
        for track in [TEMPO_TRACK, 1] {
            let parsed = round_trip::<MidiList>(&seq, &Song::default(), track);
            assert_eq!(parsed.sequence.events(), seq.events());
            assert_eq!(parsed.sequence.number(), number);
            assert_eq!(parsed.sequence.name(), "");
        }
    }
}
