// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use super::{FormatOptions, OutputFormatter, to_list};
use crate::error::{GetError, Result};
use crate::query::MergedResource;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(resources: &[MergedResource], _options: &FormatOptions) -> Result<String> {
        serde_json::to_string_pretty(&to_list(resources)).map_err(|e| GetError::Render(e.to_string()))
    }
}
