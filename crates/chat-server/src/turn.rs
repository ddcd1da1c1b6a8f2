//! Running a turn with panic isolation.

use std::panic::AssertUnwindSafe;

use dialogue::{DialogueController, DialogueError, TurnRequest, TurnResponse};
use futures::FutureExt;
use tracing::error;

/// Outcome of a turn as the HTTP layer sees it.
pub enum TurnOutcome {
    Reply(TurnResponse),
    Rejected(DialogueError),
    /// The turn panicked; the user gets the scripted apology.
    Crashed,
}

/// Run one turn, converting a panic inside it into [`TurnOutcome::Crashed`].
///
/// The turn runs on the caller's task, so dropping the returned future
/// cancels it.
pub async fn run_guarded(controller: &DialogueController, request: TurnRequest) -> TurnOutcome {
    let channel = request.channel;
    let session_key = request.session_key.clone();

    match AssertUnwindSafe(controller.handle_turn(request))
        .catch_unwind()
        .await
    {
        Ok(Ok(response)) => TurnOutcome::Reply(response),
        Ok(Err(e)) => TurnOutcome::Rejected(e),
        Err(_) => {
            error!(channel = %channel, session_key = %session_key, "Turn panicked");
            TurnOutcome::Crashed
        }
    }
}
