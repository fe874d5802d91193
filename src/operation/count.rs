
use crate::{
    bson::Document,
    coll::{
        options::{CollectionOptions, CountOptions},
        Namespace,
    },
    concern::{append_if_needed, ReadConcern},
    error::{Error, Result},
    operation::{encode_options, Command, Operation},
    selection_criteria::SelectionCriteria,
    transport::{RawError, TransportEngine},
};

pub(crate) struct Count {
    ns: Namespace,
    filter: Document,
    skip: i64,
    limit: i64,
    options: Option<CountOptions>,
    inherited_read_concern: Option<ReadConcern>,
    default_selection_criteria: Option<SelectionCriteria>,
}

impl Count {
    pub(crate) fn new(ns: Namespace, filter: Document, options: Option<CountOptions>) -> Self {
        Self {
            ns,
            filter,
            skip: 0,
            limit: 0,
            options,
            inherited_read_concern: None,
            default_selection_criteria: None,
        }
    }

    /// Sets the positional skip and limit handed to the engine alongside the options document.
    pub(crate) fn with_bounds(mut self, skip: i64, limit: i64) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// Uses the collection's read concern and read preference as the defaults for this count.
    pub(crate) fn with_collection_defaults(mut self, defaults: &CollectionOptions) -> Self {
        self.inherited_read_concern = defaults.read_concern.clone();
        self.default_selection_criteria = defaults.selection_criteria.clone();
        self
    }

    /// The encoded options document is authoritative for `skip` and `limit`, so the positional
    /// values are zeroed when the same option is present in it.
    fn resolve_positional(&mut self, options: Option<&Document>) {
        let Some(options) = options else {
            return;
        };
        if options.contains_key("skip") {
            self.skip = 0;
        }
        if options.contains_key("limit") {
            self.limit = 0;
        }
    }

    fn compose_read_concern(&self, encoded: Option<Document>) -> Result<Option<Document>> {
        let explicit = self
            .options
            .as_ref()
            .and_then(|options| options.read_concern.as_ref());
        match explicit {
            Some(read_concern) => append_if_needed(
                Some(read_concern),
                encoded,
                self.inherited_read_concern.as_ref(),
            ),
            None => append_if_needed(self.inherited_read_concern.as_ref(), encoded, None),
        }
    }
}

impl Operation for Count {
    type O = u64;
    type Response = i64;

    const NAME: &'static str = "count";

    fn build(&mut self) -> Result<Command> {
        let encoded = encode_options(self.options.as_ref())?;
        self.resolve_positional(encoded.as_ref());
        let body = self.compose_read_concern(encoded)?;

        let mut command = Command::new(Self::NAME, &self.ns.db, &self.ns.coll, body);
        command.selection_criteria = self
            .options
            .as_ref()
            .and_then(|options| options.selection_criteria.clone())
            .or_else(|| self.default_selection_criteria.clone());
        Ok(command)
    }

    fn dispatch(
        &self,
        engine: &dyn TransportEngine,
        command: &Command,
    ) -> std::result::Result<i64, RawError> {
        engine.count(
            &self.filter,
            self.skip,
            self.limit,
            command.body.as_ref(),
            command.read_preference(),
        )
    }

    fn handle_response(&self, response: i64) -> Result<Self::O> {
        u64::try_from(response).map_err(|_| {
            Error::from(RawError::new(
                0,
                0,
                format!(
                    "{} on {} reported failure sentinel {} without error details",
                    Self::NAME,
                    self.ns,
                    response
                ),
            ))
        })
    }
}
