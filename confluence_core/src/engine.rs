use crate::ConfluenceError;
use crate::ConfluenceResult;
use crate::MatchStatus;
use crate::Matcher;
use crate::PlaceholderOptions;

/// Which of the engine's mutually exclusive phases is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
	/// Waiting for the next chunk from upstream.
	Idle,
	/// A chunk is loaded and [`Engine::next_segment`] may be called.
	Scanning,
	/// A placeholder was found and its replacement has not been forwarded
	/// yet. Scanning is suspended until [`Engine::complete_replacement`].
	AwaitingReplacement,
	/// End of input has been signalled.
	Finished,
	/// An error stopped the stream. No further work is accepted.
	Halted,
}

/// Output of one [`Engine::next_segment`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
	/// A complete placeholder. `literal` is the text that precedes it and must
	/// be forwarded before the replacement.
	Placeholder { literal: &'a [u8], filename: &'a [u8] },
	/// The chunk is used up. `literal` is the remaining text that can be
	/// forwarded now; anything that might still start a placeholder is kept
	/// back as carry-over.
	Exhausted { literal: &'a [u8] },
}

/// Sans-IO driver that scans chunks for placeholders.
///
/// The engine never performs I/O. The caller pushes a chunk, pulls
/// [`Segment`]s until the chunk is exhausted, and after every
/// [`Segment::Placeholder`] forwards the replacement and calls
/// [`complete_replacement`](Self::complete_replacement). The engine refuses to
/// scan while a replacement is outstanding.
#[derive(Debug)]
pub struct Engine {
	matcher: Matcher,
	/// Carry-over from the previous chunk followed by the newest chunk.
	chunk: Vec<u8>,
	/// Index of the next byte to feed to the matcher.
	scan_position: usize,
	/// Start of the literal span that has not been emitted yet.
	literal_start: usize,
	/// Where the unresolved match attempt began, if one is in progress.
	match_prefix_start: Option<usize>,
	/// Bytes of an unresolved match kept back at a chunk boundary.
	carry_over: Vec<u8>,
	state: EngineState,
}

impl Default for Engine {
	fn default() -> Self {
		Self::new(Matcher::from_options(&PlaceholderOptions::default()))
	}
}

impl Engine {
	pub fn new(matcher: Matcher) -> Self {
		Self {
			matcher,
			chunk: Vec::new(),
			scan_position: 0,
			literal_start: 0,
			match_prefix_start: None,
			carry_over: Vec::new(),
			state: EngineState::Idle,
		}
	}

	/// Build an engine after validating `options`.
	pub fn from_options(options: &PlaceholderOptions) -> ConfluenceResult<Self> {
		options.validate()?;
		Ok(Self::new(Matcher::from_options(options)))
	}

	pub fn state(&self) -> EngineState {
		self.state
	}

	/// Bytes currently held back because they may begin a placeholder.
	pub fn carry_over(&self) -> &[u8] {
		&self.carry_over
	}

	pub fn matcher(&self) -> &Matcher {
		&self.matcher
	}

	/// Load the next chunk of input.
	pub fn push(&mut self, chunk: &[u8]) -> ConfluenceResult<()> {
		self.expect_state(EngineState::Idle)?;

		self.chunk.clear();
		self.literal_start = 0;

		if self.carry_over.is_empty() {
			self.scan_position = 0;
			self.match_prefix_start = None;
		} else {
			// The matcher already consumed the carried bytes, so scanning resumes
			// at the first byte of the new data.
			tracing::trace!(carried = self.carry_over.len(), "resuming partial match");
			self.chunk.append(&mut self.carry_over);
			self.scan_position = self.chunk.len();
			self.match_prefix_start = Some(0);
		}

		self.chunk.extend_from_slice(chunk);
		self.state = EngineState::Scanning;

		Ok(())
	}

	/// Scan forward until a placeholder completes or the chunk runs out.
	pub fn next_segment(&mut self) -> ConfluenceResult<Segment<'_>> {
		self.expect_state(EngineState::Scanning)?;

		while self.scan_position < self.chunk.len() {
			let unit = self.chunk[self.scan_position];
			let position = self.scan_position;
			self.scan_position += 1;

			match self.matcher.advance(unit) {
				MatchStatus::NoMatch | MatchStatus::Matching => {}
				MatchStatus::MatchStart => {
					if self.match_prefix_start.is_none() {
						self.match_prefix_start = Some(position);
					}
				}
				// The abandoned prefix, including the breaking byte, stays in the
				// literal span and is never scanned again.
				MatchStatus::MatchAbort => self.match_prefix_start = None,
				MatchStatus::MatchFound => {
					let literal_end = self.match_prefix_start.take().unwrap_or(position);
					let literal_start = self.literal_start;
					self.literal_start = self.scan_position;
					self.state = EngineState::AwaitingReplacement;

					return Ok(Segment::Placeholder {
						literal: &self.chunk[literal_start..literal_end],
						filename: self.matcher.filename(),
					});
				}
			}
		}

		let literal_start = self.literal_start;
		let literal_end = match self.match_prefix_start {
			Some(prefix_start) if self.matcher.is_matching() => {
				self.carry_over.extend_from_slice(&self.chunk[prefix_start..]);
				tracing::trace!(carried = self.carry_over.len(), "holding partial match");
				prefix_start
			}
			_ => self.chunk.len(),
		};

		self.literal_start = self.chunk.len();
		self.state = EngineState::Idle;

		Ok(Segment::Exhausted {
			literal: &self.chunk[literal_start..literal_end],
		})
	}

	/// Resume scanning after the replacement for the last placeholder has been
	/// fully forwarded.
	pub fn complete_replacement(&mut self) -> ConfluenceResult<()> {
		self.expect_state(EngineState::AwaitingReplacement)?;
		self.state = EngineState::Scanning;

		Ok(())
	}

	/// Signal end of input. Returns the carry-over, which must be forwarded
	/// verbatim since it never became a placeholder.
	pub fn finish(&mut self) -> ConfluenceResult<Vec<u8>> {
		self.expect_state(EngineState::Idle)?;

		self.matcher.reset();
		self.chunk = Vec::new();
		self.match_prefix_start = None;
		self.state = EngineState::Finished;

		Ok(std::mem::take(&mut self.carry_over))
	}

	/// Stop the engine permanently.
	pub fn halt(&mut self) {
		self.matcher.reset();
		self.chunk = Vec::new();
		self.carry_over = Vec::new();
		self.match_prefix_start = None;
		self.state = EngineState::Halted;
	}

	fn expect_state(&self, expected: EngineState) -> ConfluenceResult<()> {
		match self.state {
			actual if actual == expected => Ok(()),
			EngineState::Halted => Err(ConfluenceError::Halted),
			actual => Err(ConfluenceError::InvalidState { expected, actual }),
		}
	}
}
