use crate::config::PageConfig;
use crate::toolkit::Toolkit;
use std::rc::Rc;

/// What every behavior gets handed at init.
#[derive(Clone, Debug)]
pub struct PageContext {
    pub config: Rc<PageConfig>,
    pub toolkit: Toolkit,
}

impl PageContext {
    pub fn new(config: PageConfig, toolkit: Toolkit) -> Self {
        Self {
            config: Rc::new(config),
            toolkit,
        }
    }
}
