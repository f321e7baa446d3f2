// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use quotelens_core::QuoteLensError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Group keys take 1 to 3 dimensions, got {0}")]
    InvalidArity(usize),
    #[error("Dimension `{0}` appears more than once in a grouping")]
    DuplicateDimension(&'static str),
    #[error("Dimension `{0}` is not valid here")]
    InvalidDimension(&'static str),
    #[error("Hierarchy is ragged: expected depth {expected}, found {found}")]
    RaggedHierarchy { expected: usize, found: usize },
    #[error("Category `{0}` has no graph node")]
    UnknownCategory(String),
    #[error(transparent)]
    Core(#[from] QuoteLensError),
}
