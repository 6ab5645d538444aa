//! Human-readable note names and controller descriptions.

use core::fmt::Write;
use heapless::String;

/// Note name such as `"G#2"` or `"C#-1"`.
pub type NoteName = String<4>;

/// Controller description, at most one status-line name field wide.
pub type CcName = String<16>;

/// Lookup used by the decoder to label notes and controllers.
pub trait NameLookup {
    fn note_name(&self, note: u8) -> NoteName;
    fn cc_description(&self, control: u8) -> CcName;
}

/// Scientific pitch notation (middle C = 60 = `"C4"`) and General MIDI
/// controller names.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardNames;

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl NameLookup for StandardNames {
    fn note_name(&self, note: u8) -> NoteName {
        let note = note & 0x7F;
        let octave = (note / 12) as i8 - 1;
        let mut name = NoteName::new();
        let _ = write!(name, "{}{}", PITCH_CLASSES[(note % 12) as usize], octave);
        name
    }

    fn cc_description(&self, control: u8) -> CcName {
        let mut name = CcName::new();
        match controller_name(control) {
            Some(text) => {
                let _ = name.push_str(text);
            }
            None => {
                let _ = write!(name, "CC {}", control);
            }
        }
        name
    }
}

fn controller_name(control: u8) -> Option<&'static str> {
    let text = match control {
        0 => "Bank Select",
        1 => "Modulation",
        2 => "Breath Ctrl",
        4 => "Foot Ctrl",
        5 => "Portamento Time",
        6 => "Data Entry",
        7 => "Volume",
        8 => "Balance",
        10 => "Pan",
        11 => "Expression",
        12 => "Effect Ctrl 1",
        13 => "Effect Ctrl 2",
        16..=19 => "General Purpose",
        32 => "Bank Select LSB",
        33..=63 => "LSB",
        64 => "Sustain",
        65 => "Portamento",
        66 => "Sostenuto",
        67 => "Soft Pedal",
        68 => "Legato",
        69 => "Hold 2",
        70 => "Sound Variation",
        71 => "Resonance",
        72 => "Release Time",
        73 => "Attack Time",
        74 => "Cutoff",
        75 => "Decay Time",
        76 => "Vibrato Rate",
        77 => "Vibrato Depth",
        78 => "Vibrato Delay",
        79 => "Sound Ctrl 10",
        80..=83 => "General Purpose",
        84 => "Portamento Ctrl",
        88 => "Hi-Res Velocity",
        91 => "Reverb",
        92 => "Tremolo",
        93 => "Chorus",
        94 => "Detune",
        95 => "Phaser",
        96 => "Data Increment",
        97 => "Data Decrement",
        98 => "NRPN LSB",
        99 => "NRPN MSB",
        100 => "RPN LSB",
        101 => "RPN MSB",
        120 => "All Sound Off",
        121 => "Reset All Ctrl",
        122 => "Local Control",
        123 => "All Notes Off",
        124 => "Omni Off",
        125 => "Omni On",
        126 => "Mono On",
        127 => "Poly On",
        _ => return None,
    };
    Some(text)
}
