use thiserror::Error;

use baton_graph::GraphError;
use baton_state::StoreError;

#[derive(Debug, Error)]
pub enum RouterError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Graph(#[from] GraphError),
}
