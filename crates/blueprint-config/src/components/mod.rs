// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Component sub-records of an [`crate::InstanceConfig`], grouped by
//! concern.

pub mod advanced;
pub mod network;
pub mod storage;
