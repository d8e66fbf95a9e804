// Copyright 2025 HEM Sp. z o.o.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Lines starting with this prefix carry a tally vector.
pub const TALLY_PREFIX: &str = "TALLY OK";

// "TALLY OK " including the separating space
const TALLY_HEADER_LEN: usize = 9;

/// Status of a single input as reported by vMix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TallyStatus {
    #[default]
    Off,
    /// On program (live).
    Program,
    Preview,
    /// Any status character other than '0', '1' or '2'.
    Unknown(u8),
}

impl TallyStatus {
    fn from_code(code: u8) -> Self {
        match code {
            b'0' => TallyStatus::Off,
            b'1' => TallyStatus::Program,
            b'2' => TallyStatus::Preview,
            other => TallyStatus::Unknown(other),
        }
    }
}

/// Input whose status differs between two consecutive tally vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyChange {
    /// 1-based input number.
    pub input: usize,
    pub previous: TallyStatus,
    pub current: TallyStatus,
}

/// Most recently received tally vector, indexed by input number minus one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallyState {
    inputs: Vec<TallyStatus>,
}

impl TallyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw tally line. Returns `None` when the payload is not a tally message.
    pub fn parse(raw: &str) -> Option<Self> {
        if !raw.starts_with(TALLY_PREFIX) {
            return None;
        }
        let line = raw
            .strip_suffix("\r\n")
            .or_else(|| raw.strip_suffix('\n'))
            .unwrap_or(raw);
        let codes = line.as_bytes().get(TALLY_HEADER_LEN..).unwrap_or_default();
        Some(Self {
            inputs: codes.iter().copied().map(TallyStatus::from_code).collect(),
        })
    }

    /// Replace the whole state with the vector carried by `raw`.
    ///
    /// Non tally payloads leave the state untouched and return `None`. Otherwise the inputs whose
    /// status changed are returned; inputs missing from either vector count as [`TallyStatus::Off`].
    pub fn apply_update(&mut self, raw: &str) -> Option<Vec<TallyChange>> {
        let next = Self::parse(raw)?;
        let changes = self.diff(&next);
        *self = next;
        Some(changes)
    }

    fn diff(&self, next: &TallyState) -> Vec<TallyChange> {
        let len = self.inputs.len().max(next.inputs.len());
        (0..len)
            .filter_map(|i| {
                let previous = self.inputs.get(i).copied().unwrap_or_default();
                let current = next.inputs.get(i).copied().unwrap_or_default();
                (previous != current).then_some(TallyChange { input: i + 1, previous, current })
            })
            .collect()
    }

    /// Status of a 1-based input. Any index outside the latest vector yields `None`.
    pub fn get(&self, input: i64) -> Option<TallyStatus> {
        let index = usize::try_from(input.checked_sub(1)?).ok()?;
        self.inputs.get(index).copied()
    }

    pub fn is_live(&self, input: i64) -> bool {
        self.get(input) == Some(TallyStatus::Program)
    }

    pub fn is_previewed(&self, input: i64) -> bool {
        self.get(input) == Some(TallyStatus::Preview)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
