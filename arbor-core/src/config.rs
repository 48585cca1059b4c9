// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

/// Configuration for marshalling.
///
/// Held by the [`Arbor`](crate::arbor::Arbor) facade and copied into every
/// [`TreeMarshaller`](crate::marshaller::TreeMarshaller) it creates.
#[derive(Clone, Debug)]
pub struct Config {
    /// Open the root node with `start_node_with_type` so the writer also sees
    /// the originating runtime type.
    pub type_hints: bool,
    /// Maximum length of the ancestor path. `None` leaves recursion unbounded.
    pub max_depth: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            type_hints: true,
            max_depth: None,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn is_type_hints(&self) -> bool {
        self.type_hints
    }

    #[inline(always)]
    pub fn max_depth(&self) -> Option<u32> {
        self.max_depth
    }
}
