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

use crate::Credential;
use aliyun_log_core::{Context, ProvideCredential, Result};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// SharedCredentialProvider serves a credential snapshot that callers can swap at any time.
///
/// Clones share the same snapshot. This is the hook for short-lived session
/// tokens: a refresh task owned by the caller calls [`SharedCredentialProvider::update`]
/// and every following request picks up the new credential.
///
/// ```no_run
/// use aliyun_log::{Credential, SharedCredentialProvider};
///
/// let provider = SharedCredentialProvider::new(Credential::new("ak", "sk"));
/// let updater = provider.clone();
/// updater.update(Credential::new("ak", "sk").with_security_token("token"));
/// ```
#[derive(Debug, Clone)]
pub struct SharedCredentialProvider {
    credential: Arc<RwLock<Credential>>,
}

impl SharedCredentialProvider {
    /// Create a new provider holding the initial credential.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential: Arc::new(RwLock::new(credential)),
        }
    }

    /// Replace the current credential.
    pub fn update(&self, credential: Credential) {
        // The snapshot is always replaced whole, a poisoned lock still holds a full value.
        let mut guard = self.credential.write().unwrap_or_else(|e| e.into_inner());
        *guard = credential;
    }

    /// Take a copy of the current credential.
    pub fn current(&self) -> Credential {
        self.credential
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProvideCredential for SharedCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(self.current()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_is_visible_to_clones() {
        let provider = SharedCredentialProvider::new(Credential::new("ak1", "sk1"));
        let updater = provider.clone();

        updater.update(Credential::new("ak2", "sk2").with_security_token("token"));

        let cred = provider
            .provide_credential(&Context::new())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cred.access_key_id, "ak2");
        assert_eq!(cred.security_token.as_deref(), Some("token"));
    }
}
