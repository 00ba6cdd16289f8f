use rowquery_parser::{
    parse_sort,
    tokens::{SORT_ASC, SORT_DESC},
};
use serde::{Deserialize, Serialize};

use crate::query::Sort;

/// The sort URL parameter, e.g. `timestamp.desc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortParam {
    pub id: String,
    pub desc: bool,
}

impl SortParam {
    pub fn encode(&self, delimiter: char) -> String {
        let direction = if self.desc { SORT_DESC } else { SORT_ASC };
        format!("{}{delimiter}{direction}", self.id)
    }

    pub fn decode(input: &str, delimiter: char) -> Option<SortParam> {
        parse_sort(input.trim(), delimiter)
            .ok()
            .map(|token| SortParam {
                id: token.id,
                desc: token.desc,
            })
    }
}

impl From<SortParam> for Sort {
    fn from(param: SortParam) -> Self {
        if param.desc {
            Sort::desc(param.id)
        } else {
            Sort::asc(param.id)
        }
    }
}
