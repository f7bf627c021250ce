// This file is part of the terraform-provider-datadog project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
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

//! Field-table driven mapping between Terraform values and Datadog JSON.
//!
//! Each field is described once in a [`field::FieldSpec`] table. The same
//! table generates the Terraform schema, builds request bodies from the
//! Terraform tree and flattens API responses back into it.

pub mod build;
pub mod dashboard;
pub mod error;
pub mod field;
pub mod flatten;
pub mod plan;
pub mod powerpack;
pub mod schema;
pub mod validate;
pub mod value;
pub mod widgets;

pub use build::JsonMap;
pub use error::{FieldPath, MappingError};
pub use value::{Object, TfValue, TfValueExt};
