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

//! Operations of the log service, grouped by resource.
//!
//! Every call returns a [`Response`](crate::Response) envelope once the service
//! answered, even on a failed status; `Err` is reserved for local failures and
//! transport errors. Use [`Response::into_result`](crate::Response::into_result)
//! to turn a failed envelope into an error.

mod logs;
mod logstore;
mod project;
mod shard;
