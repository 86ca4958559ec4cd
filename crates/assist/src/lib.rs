//! Finds the questions a form asks, attaches an answer surface to each, and writes accepted
//! answers back into the document.
//!
//! A pass runs [`scanner::scan`] over the page's [`html::Document`]; every resolved question
//! gets an [`surface::AnswerSurface`] from the [`injection::InjectionController`]. Opening a
//! surface hands the question to an [`answer_source::AnswerSource`], and the result arrives
//! later as a bus event handled by [`page::Page::handle_event`].

pub mod answer_source;
pub mod autofill;
pub mod context;
pub mod injection;
pub mod markers;
pub mod page;
pub mod scanner;
pub mod scheduler;
pub mod session;
pub mod surface;
pub mod text_resolver;

pub use answer_source::{AnswerSource, AnswerSourceError, BusAnswerSource, SolveRequest};
pub use autofill::AutofillOutcome;
pub use injection::{InjectionController, Toggle};
pub use markers::ProcessedMarkers;
pub use page::Page;
pub use scanner::{Candidate, CandidateKind, ResolvedQuestion, scan};
pub use scheduler::{RESCAN_INTERVAL, RescanScheduler};
pub use session::{ContentSession, Pumped};
pub use surface::{AnswerSurface, SurfaceAnchor, SurfaceState};
