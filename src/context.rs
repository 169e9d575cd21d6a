use std::rc::Rc;

use crate::api::FraudApi;
use crate::request::HttpClient;
use crate::session::SessionGuard;
use crate::web::generation::Generation;
use crate::web::location::Location;
use crate::web::surface::Surface;

/// 应用上下文
///
/// 路由与各控制器共享的显式句柄集合，在构造时注入。
pub struct AppContext<C: HttpClient> {
    pub api: FraudApi<C>,
    pub session: SessionGuard,
    pub location: Location,
    pub surface: Rc<dyn Surface>,
    /// 每次位置变化递增，用于识别过期的异步结果
    pub navigation: Generation,
}

impl<C: HttpClient> AppContext<C> {
    pub fn new(api: FraudApi<C>, surface: Rc<dyn Surface>, initial_fragment: &str) -> Self {
        Self {
            api,
            session: SessionGuard::new(),
            location: Location::new(initial_fragment),
            surface,
            navigation: Generation::new(),
        }
    }
}
