// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use super::{FormatOptions, OutputFormatter, to_list};
use crate::error::{GetError, Result};
use crate::query::MergedResource;

pub struct YamlFormatter;

impl OutputFormatter for YamlFormatter {
    fn format(resources: &[MergedResource], _options: &FormatOptions) -> Result<String> {
        serde_yaml::to_string(&to_list(resources)).map_err(|e| GetError::Render(e.to_string()))
    }
}
