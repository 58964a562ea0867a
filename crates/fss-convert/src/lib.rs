//! Conversion of IT pattern data into FSS note sequences.
//!
//! Pipeline: the loaded [`Module`] is walked in order-list order by
//! [`RowAggregator`], each [`Run`] is split into length tokens, tempo and
//! speed commands go through [`TempoTranslator`], and [`NoteEncoder`]
//! renders the result as [`Line`]s.

mod aggregate;
mod classify;
mod duration;
mod encode;
mod error;
mod line;
mod tempo;

pub use aggregate::{RowAggregator, Run, Segment, Sound};
pub use classify::{Classifier, Pitch, Voice, TONE_OCTAVES};
pub use duration::{split, LengthToken};
pub use encode::{NoteEncoder, VolumeLevel};
pub use error::{ConvertError, SemanticError};
pub use line::{render, Line, GENERATOR};
pub use tempo::{PauseAdvisory, TempoTranslator, TEMPO_SCALE};

use fss_ir::Module;

/// Conversion settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Tracker channel to translate (0-based)
    pub channel: u8,
    pub classifier: Classifier,
}

/// Statistics and diagnostics of a finished conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub patterns: usize,
    pub runs: usize,
    pub rows: usize,
    pub advisories: Vec<PauseAdvisory>,
}

impl Report {
    fn check_tempo(&mut self, value: u32, row: Option<usize>) {
        if let Some(advisory) = PauseAdvisory::check(value, row) {
            tracing::warn!(
                tempo = value,
                row = ?row,
                "FSS tempo t{} ends in 1, 2, 4 or 8; the synth may insert pauses",
                value
            );
            self.advisories.push(advisory);
        }
    }
}

/// Lines plus report of a successful conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub lines: Vec<Line>,
    pub report: Report,
}

impl Conversion {
    /// File text of the converted song.
    pub fn render(&self) -> String {
        render(&self.lines)
    }
}

/// Convert a loaded module, appending lines to `out`.
///
/// On error `out` keeps every line produced before the failing run.
pub fn convert_into(
    module: &Module,
    options: &ConvertOptions,
    out: &mut Vec<Line>,
) -> Result<Report, ConvertError> {
    let mut translator = TempoTranslator::new(module.initial_tempo, module.initial_speed)?;
    let mut report = Report::default();

    let initial = translator.translate();
    report.check_tempo(initial, None);
    out.push(Line::Tempo(initial));
    out.push(Line::Blank);
    out.push(Line::generator());
    out.push(Line::Blank);

    let encoder = NoteEncoder::new(options.classifier);
    let segments = RowAggregator::new(module, options.classifier.requires_instrument());

    for segment in segments {
        match segment? {
            Segment::Pattern(index) => {
                tracing::debug!(pattern = index, "pattern");
                report.patterns += 1;
                out.push(Line::pattern(index));
            }
            Segment::Run(run) => {
                let tempo = run.tempo.map(|command| translator.apply(command)).transpose()?;
                if let (Some(command), Some(value)) = (run.tempo, tempo) {
                    tracing::debug!(
                        row = run.start_row,
                        "{}{:02X} -> t{}",
                        command.letter(),
                        command.value(),
                        value
                    );
                    report.check_tempo(value, Some(run.start_row));
                }
                tracing::debug!(row = run.start_row, rows = run.rows, sound = ?run.sound, "run");
                encoder.encode(&run, tempo, out)?;
                report.runs += 1;
                report.rows += run.rows as usize;
            }
        }
    }

    Ok(report)
}

/// Convert a loaded module.
pub fn convert(module: &Module, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut lines = Vec::new();
    let report = convert_into(module, options, &mut lines)?;
    Ok(Conversion { lines, report })
}

/// Load an IT module from bytes and convert it.
pub fn convert_bytes(data: &[u8], options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let module = fss_formats::load_it(data, options.channel)?;
    convert(&module, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fss_formats::fixture::{ModuleBuilder, PatternWriter, Record};
    use fss_formats::FormatError;
    use pretty_assertions::assert_eq;

    fn header(tempo: u32) -> String {
        format!("{}\n\n> generated by {} {}\n\n", tempo, GENERATOR, env!("CARGO_PKG_VERSION"))
    }

    #[test]
    fn single_note_song() {
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0, 255])
            .pattern(PatternWriter::new().row(&[(0, Record::note(69, 1, 64))]))
            .build();

        let conversion = convert_bytes(&data, &ConvertOptions::default()).unwrap();
        assert_eq!(conversion.render(), format!("{}> pattern 0\na51f\n", header(2496)));
        assert_eq!(conversion.report.runs, 1);
        assert_eq!(conversion.report.rows, 1);
        assert!(conversion.report.advisories.is_empty());
    }

    #[test]
    fn kick_run_over_forty_rows() {
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0, 255])
            .pattern(
                PatternWriter::new()
                    .row(&[(0, Record::note(60, 3, 64).with_command(20, 200))])
                    .empty_rows(39),
            )
            .build();

        let conversion = convert_bytes(&data, &ConvertOptions::default()).unwrap();
        // 2500 / 200 * 6
        assert_eq!(
            conversion.render(),
            format!("{}> pattern 0\nt72\nK-f\nr-f\nr-8\n", header(2496))
        );
    }

    #[test]
    fn speed_change_mid_song() {
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(125)
            .orders(&[0, 1, 255])
            .pattern(PatternWriter::new().row(&[(0, Record::note(69, 1, 64))]).empty_rows(1))
            .pattern(
                PatternWriter::new()
                    .row(&[(0, Record::note(71, 1, 32).with_command(1, 3))])
                    .empty_rows(3),
            )
            .build();

        let conversion = convert_bytes(&data, &ConvertOptions::default()).unwrap();
        assert_eq!(
            conversion.render(),
            format!("{}> pattern 0\na52f\n> pattern 1\nt60\nb548\n", header(120))
        );
        assert_eq!(conversion.report.patterns, 2);
    }

    #[test]
    fn pause_prone_tempo_is_reported() {
        let data = ModuleBuilder::new()
            .speed(3)
            .tempo(150)
            .orders(&[0])
            .pattern(PatternWriter::new().row(&[(0, Record::note(69, 2, 64))]))
            .build();

        let conversion = convert_bytes(&data, &ConvertOptions::default()).unwrap();
        assert!(conversion.render().starts_with("48\n\n"));
        assert_eq!(conversion.report.advisories, vec![PauseAdvisory { value: 48, row: None }]);
    }

    #[test]
    fn missing_instrument_keeps_earlier_lines() {
        let cut = Record { note: Some(254), ..Record::default() };
        let bare = Record { note: Some(62), ..Record::default() };

        // the instrument of pattern 0 does not reach into pattern 1
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0, 1, 255])
            .pattern(PatternWriter::new().row(&[(0, Record::note(69, 2, 64))]))
            .pattern(PatternWriter::new().row(&[(0, bare)]))
            .build();
        let module = fss_formats::load_it(&data, 0).unwrap();

        let mut out = Vec::new();
        let err = convert_into(&module, &ConvertOptions::default(), &mut out).unwrap_err();
        assert_eq!(err, ConvertError::Semantic(SemanticError::MissingInstrument { row: 1 }));
        assert_eq!(
            render(&out),
            format!("{}> pattern 0\nx-1f\n> pattern 1\n", header(2496))
        );

        // the rest before the failing note is written
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0, 1, 255])
            .pattern(PatternWriter::new().row(&[(0, cut)]).empty_rows(1))
            .pattern(PatternWriter::new().row(&[(0, bare)]))
            .build();
        let module = fss_formats::load_it(&data, 0).unwrap();

        let mut out = Vec::new();
        let err = convert_into(&module, &ConvertOptions::default(), &mut out).unwrap_err();
        assert_eq!(err, ConvertError::Semantic(SemanticError::MissingInstrument { row: 2 }));
        assert_eq!(
            render(&out),
            format!("{}> pattern 0\nr-2\n> pattern 1\n", header(2496))
        );
    }

    #[test]
    fn octave_strategy_needs_no_instrument() {
        let bare = |note| Record { note: Some(note), volume: Some(64), ..Record::default() };
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0])
            .pattern(PatternWriter::new().row(&[(0, bare(12))]).row(&[(0, bare(105))]).row(&[(0, bare(69))]))
            .build();

        let octave = ConvertOptions { classifier: Classifier::Octave, ..Default::default() };
        let conversion = convert_bytes(&data, &octave).unwrap();
        assert_eq!(conversion.render(), format!("{}> pattern 0\nK-1\nS-1\na51f\n", header(2496)));

        let err = convert_bytes(&data, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::Semantic(SemanticError::MissingInstrument { row: 0 }));
    }

    #[test]
    fn selected_channel() {
        let data = ModuleBuilder::new()
            .speed(6)
            .tempo(6)
            .orders(&[0])
            .pattern(
                PatternWriter::new()
                    .row(&[(0, Record::note(69, 1, 64)), (2, Record::note(60, 2, 40))]),
            )
            .build();

        let options = ConvertOptions { channel: 2, ..Default::default() };
        let conversion = convert_bytes(&data, &options).unwrap();
        assert_eq!(conversion.render(), format!("{}> pattern 0\nx-1a\n", header(2496)));
    }

    #[test]
    fn format_errors_pass_through() {
        let err = convert_bytes(b"MTM\x10", &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::Format(FormatError::BadMagic));
    }

    #[test]
    fn zero_header_tempo() {
        let data = ModuleBuilder::new().tempo(0).orders(&[255]).build();
        let err = convert_bytes(&data, &ConvertOptions::default()).unwrap_err();
        assert_eq!(err, ConvertError::Semantic(SemanticError::ZeroTempo));
    }
}
