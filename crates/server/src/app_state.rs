use storage::Storage;
use tournament::Tournament;

pub(crate) struct AppState {
    pub(crate) tournament: Tournament<Storage>,
}
