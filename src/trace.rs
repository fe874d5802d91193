use std::time::Duration;

use crate::{
    bson::{Bson, Document},
    operation::Command,
    selection_criteria::SelectionCriteria,
};

pub(crate) const COMMAND_TRACING_EVENT_TARGET: &str = "mongodb_core::command";

pub(crate) trait TracingRepresentation {
    type Representation;

    fn tracing_representation(&self) -> Self::Representation;
}

impl TracingRepresentation for Document {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        Bson::Document(self.clone())
            .into_relaxed_extjson()
            .to_string()
    }
}

impl TracingRepresentation for SelectionCriteria {
    type Representation = String;

    fn tracing_representation(&self) -> Self::Representation {
        self.to_string()
    }
}

pub(crate) fn command_started(command: &Command) {
    tracing::debug!(
        target: COMMAND_TRACING_EVENT_TARGET,
        command = command
            .body
            .as_ref()
            .map(|body| body.tracing_representation()),
        databaseName = command.target_db.as_str(),
        collectionName = command.target_coll.as_str(),
        commandName = command.name,
        readPreference = command
            .selection_criteria
            .as_ref()
            .map(|criteria| criteria.tracing_representation()),
        "Command started"
    );
}

pub(crate) fn command_succeeded(command: &Command, duration: Duration) {
    tracing::debug!(
        target: COMMAND_TRACING_EVENT_TARGET,
        databaseName = command.target_db.as_str(),
        commandName = command.name,
        durationMS = duration.as_millis(),
        "Command succeeded"
    );
}
