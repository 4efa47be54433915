use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use monster::planes::data::MovieOperations;
use monster::Movie;
use tracing::{error, info, warn};

/// GET /movie/{movie_id}
///
/// Every failure is logged and answered with an empty 200; only an
/// unreachable metadata API can end the process, and only when
/// `fatal_transport_errors` is set.
pub async fn get_movie(State(state): State<AppState>, Path(movie_id): Path<String>) -> Response {
    info!("GET: movie={}", movie_id);

    match state.movie_operations.lookup(&movie_id).await {
        Ok(found) => {
            info!(
                "Movie {} served ({} bytes, from_cache={})",
                movie_id,
                found.body.len(),
                found.from_cache
            );
            // The poster download must not hold up or alter the response
            spawn_poster_download(&state, found.movie);
            ([(header::CONTENT_TYPE, "application/json")], found.body).into_response()
        }
        Err(e) if e.is_transport() && state.config.fatal_transport_errors => {
            error!("Metadata API unreachable while fetching movie {}: {}", movie_id, e);
            std::process::exit(1);
        }
        Err(e) => {
            warn!("Lookup failed for movie {}: {}", movie_id, e);
            StatusCode::OK.into_response()
        }
    }
}

fn spawn_poster_download(state: &AppState, movie: Movie) {
    let operations = state.movie_operations.clone();
    state.poster_tasks.spawn(async move {
        match operations.save_poster(&movie).await {
            Ok(saved) => info!("Done! {} ({} bytes)", saved.file_name, saved.bytes_written),
            Err(shared::Error::NoPoster) => warn!("Movie has no poster path, nothing to download"),
            Err(e) => warn!("Poster download failed: {}", e),
        }
    });
}
