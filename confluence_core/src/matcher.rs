use derive_more::Deref;

use crate::PlaceholderOptions;

/// The byte that opens and closes a captured filename.
pub const FILENAME_DELIMITER: u8 = b'"';

/// Classification of a single [`Matcher::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
	/// The matcher is idle and the unit does not begin a placeholder.
	NoMatch,
	/// The unit moved the matcher off the first step.
	MatchStart,
	/// The unit was accepted somewhere inside the placeholder.
	Matching,
	/// The unit broke an in-progress match. The matcher is idle again and the
	/// units scanned so far are ordinary text.
	MatchAbort,
	/// The unit completed a placeholder. [`Matcher::filename`] holds the
	/// captured filename.
	MatchFound,
}

/// One step of a compiled [`TokenSequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
	/// A byte that must appear verbatim.
	Literal(u8),
	/// Accumulate filename bytes until the closing [`FILENAME_DELIMITER`].
	Capture,
}

/// Ordered steps that make up a placeholder:
/// `start` literals, opening quote, capture, `end` literals.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct TokenSequence(Vec<Step>);

impl TokenSequence {
	pub fn new(start: &[u8], end: &[u8]) -> Self {
		let steps = start
			.iter()
			.copied()
			.map(Step::Literal)
			.chain([Step::Literal(FILENAME_DELIMITER), Step::Capture])
			.chain(end.iter().copied().map(Step::Literal))
			.collect();

		Self(steps)
	}

	/// Upper bound on the bytes a single unresolved match attempt can span.
	/// This is the most an [`Engine`](crate::Engine) ever carries between
	/// chunks.
	pub fn max_carry_over(&self, max_filename_length: usize) -> usize {
		// The capture step accounts for the filename plus its closing quote.
		self.len() - 1 + max_filename_length + 1
	}
}

impl From<&PlaceholderOptions> for TokenSequence {
	fn from(options: &PlaceholderOptions) -> Self {
		Self::new(options.start.as_bytes(), options.end.as_bytes())
	}
}

/// Caller-driven placeholder recogniser.
///
/// Feed one byte at a time with [`advance`](Self::advance). The matcher never
/// looks backwards: a broken attempt is reported as
/// [`MatchStatus::MatchAbort`] and the caller treats the bytes it already saw
/// as literal text.
#[derive(Debug, Clone)]
pub struct Matcher {
	sequence: TokenSequence,
	/// Index of the next step to satisfy. `0` while idle.
	cursor: usize,
	filename: Vec<u8>,
	max_filename_length: usize,
}

/// Outcome of applying one unit to the current step.
enum Transition {
	Advance,
	Stay,
	Abort,
}

impl Matcher {
	pub fn new(sequence: TokenSequence, max_filename_length: usize) -> Self {
		Self {
			sequence,
			cursor: 0,
			filename: Vec::new(),
			max_filename_length,
		}
	}

	pub fn from_options(options: &PlaceholderOptions) -> Self {
		Self::new(TokenSequence::from(options), options.max_filename_length)
	}

	pub fn advance(&mut self, unit: u8) -> MatchStatus {
		let transition = match self.sequence[self.cursor] {
			Step::Literal(expected) if expected == unit => Transition::Advance,
			Step::Literal(_) if self.cursor == 0 => return MatchStatus::NoMatch,
			Step::Literal(_) => Transition::Abort,
			Step::Capture if unit == FILENAME_DELIMITER => Transition::Advance,
			Step::Capture => {
				self.filename.push(unit);

				if self.filename.len() > self.max_filename_length {
					Transition::Abort
				} else {
					Transition::Stay
				}
			}
		};

		match transition {
			Transition::Stay => MatchStatus::Matching,
			Transition::Abort => {
				self.reset();
				MatchStatus::MatchAbort
			}
			Transition::Advance => {
				self.cursor += 1;

				if self.cursor == self.sequence.len() {
					self.cursor = 0;
					return MatchStatus::MatchFound;
				}

				if self.sequence[self.cursor] == Step::Capture {
					self.filename.clear();
				}

				if self.cursor == 1 {
					MatchStatus::MatchStart
				} else {
					MatchStatus::Matching
				}
			}
		}
	}

	/// The filename captured by the most recent [`MatchStatus::MatchFound`].
	/// Only meaningful until the next match attempt reaches its capture step.
	pub fn filename(&self) -> &[u8] {
		&self.filename
	}

	/// Whether a match attempt is in progress.
	pub fn is_matching(&self) -> bool {
		self.cursor > 0
	}

	pub fn sequence(&self) -> &TokenSequence {
		&self.sequence
	}

	pub fn max_filename_length(&self) -> usize {
		self.max_filename_length
	}

	/// Abandon any in-progress attempt.
	pub fn reset(&mut self) {
		self.cursor = 0;
		self.filename.clear();
	}
}
