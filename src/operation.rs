mod count;

#[cfg(feature = "tracing-unstable")]
use std::time::Instant;

use crate::{
    bson::Document,
    codec,
    error::{Error, Result},
    selection_criteria::{ReadPreference, SelectionCriteria},
    transport::{RawError, TransportEngine},
};

pub(crate) use count::Count;

/// A trait modeling the behavior of a command handed to the transport engine.
pub(crate) trait Operation {
    /// The output type of this operation.
    type O;

    /// The raw result the transport engine reports for this operation.
    type Response;

    /// The name of the server side command associated with this operation.
    const NAME: &'static str;

    /// Returns the command that should be handed to the transport engine as part of this
    /// operation. The operation may store some additional state that is required for dispatching
    /// the command or handling the response.
    fn build(&mut self) -> Result<Command>;

    /// Hands the built command to the transport engine.
    fn dispatch(
        &self,
        engine: &dyn TransportEngine,
        command: &Command,
    ) -> std::result::Result<Self::Response, RawError>;

    /// Interprets the raw result reported by the transport engine.
    fn handle_response(&self, response: Self::Response) -> Result<Self::O>;

    /// Interpret an error reported by the transport engine, potentially recovering.
    fn handle_error(&self, error: Error) -> Result<Self::O> {
        Err(error)
    }
}

/// A fully composed command, ready to be handed to the transport engine.
#[derive(Clone, Debug)]
pub(crate) struct Command {
    // Read by the command tracing events.
    #[cfg_attr(not(feature = "tracing-unstable"), allow(dead_code))]
    pub(crate) name: &'static str,
    #[cfg_attr(not(feature = "tracing-unstable"), allow(dead_code))]
    pub(crate) target_db: String,
    #[cfg_attr(not(feature = "tracing-unstable"), allow(dead_code))]
    pub(crate) target_coll: String,
    pub(crate) body: Option<Document>,
    pub(crate) selection_criteria: Option<SelectionCriteria>,
}

impl Command {
    pub(crate) fn new(
        name: &'static str,
        target_db: impl Into<String>,
        target_coll: impl Into<String>,
        body: Option<Document>,
    ) -> Self {
        Self {
            name,
            target_db: target_db.into(),
            target_coll: target_coll.into(),
            body,
            selection_criteria: None,
        }
    }

    pub(crate) fn read_preference(&self) -> Option<&ReadPreference> {
        self.selection_criteria
            .as_ref()
            .and_then(SelectionCriteria::as_read_pref)
    }
}

/// Runs `op` against `engine`: build, dispatch, then translate the engine's result. No retries
/// are attempted and nothing is cached between calls.
pub(crate) fn execute_operation<T: Operation>(
    engine: &dyn TransportEngine,
    mut op: T,
) -> Result<T::O> {
    let command = op.build()?;

    #[cfg(feature = "tracing-unstable")]
    let start_time = Instant::now();
    #[cfg(feature = "tracing-unstable")]
    crate::trace::command_started(&command);

    match op.dispatch(engine, &command) {
        Ok(response) => {
            let output = op.handle_response(response)?;
            #[cfg(feature = "tracing-unstable")]
            crate::trace::command_succeeded(&command, start_time.elapsed());
            Ok(output)
        }
        Err(raw) => op.handle_error(raw.into()),
    }
}

/// Encodes `options` into a document, returning `None` if there are no options or all of them
/// are unset.
pub(crate) fn encode_options<T: serde::Serialize>(options: Option<&T>) -> Result<Option<Document>> {
    match options {
        Some(options) => {
            let doc = codec::to_document(options)?;
            Ok(Some(doc).filter(|doc| !doc.is_empty()))
        }
        None => Ok(None),
    }
}
